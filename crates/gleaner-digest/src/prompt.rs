//! Prompts for the digest and weekly review

use crate::gather::{DigestInput, ReviewInput};
use std::fmt::Write;

/// Plain-text context block for the daily digest
pub fn digest_context(input: &DigestInput) -> String {
    let mut context = String::from("ACTIVE PROJECTS:\n");
    for (i, p) in input.projects.iter().enumerate() {
        let _ = write!(
            context,
            "{}. {}\n   Status: {}\n   Next Action: {}\n\n",
            i + 1,
            p.name,
            p.status,
            p.next_action
        );
    }

    context.push_str("\nPEOPLE TO FOLLOW UP WITH:\n");
    for (i, p) in input.people.iter().enumerate() {
        let _ = write!(context, "{}. {}\n   Follow-up: {}\n\n", i + 1, p.name, p.follow_ups);
    }

    context.push_str("\nTASKS DUE:\n");
    for (i, t) in input.tasks.iter().enumerate() {
        let _ = write!(context, "{}. {}\n   Due: {}\n\n", i + 1, t.name, t.due_date);
    }
    context
}

/// Plain-text context block for the weekly review
pub fn review_context(input: &ReviewInput) -> String {
    let mut context = String::from("=== ITEMS CAPTURED THIS WEEK ===\n\n");
    for (i, c) in input.captures.iter().enumerate() {
        let _ = writeln!(context, "{}. [{}] {}", i + 1, c.filed_to, c.label);
        if c.needs_review {
            context.push_str("   NEEDS REVIEW\n");
        }
        context.push('\n');
    }

    context.push_str("\n=== ACTIVE PROJECTS STATUS ===\n\n");
    for (i, p) in input.projects.iter().enumerate() {
        let _ = write!(
            context,
            "{}. {}\n   Status: {}\n   Next: {}\n\n",
            i + 1,
            p.name,
            p.status,
            p.next_action
        );
    }

    context.push_str("\n=== CAPTURE SUMMARY ===\n");
    for (destination, count) in input.counts() {
        let _ = writeln!(context, "{}: {}", destination, count);
    }
    context
}

/// Prompt asking for the daily digest
pub fn digest_prompt(context: &str, date: &str) -> String {
    format!(
        "You are a personal productivity assistant. Write a short daily digest from the data below.

{context}
TODAY'S DATE: {date}

Use exactly this format and stay under 150 words:

**Good morning!**

**Top 3 Actions Today:**
1. [Most important or most overdue action from projects or tasks]
2. [Second priority]
3. [Third priority]

**People to Connect With:**
- [Name]: [Short follow-up reminder]

**Watch Out For:**
[One thing that looks stuck, overdue or neglected]

**One Small Win to Notice:**
[Progress made, or something encouraging]

Rules:
- Be specific and actionable
- Put overdue items and concrete next actions first
- Leave out any section with nothing in it
- No commentary outside the format"
    )
}

/// Prompt asking for the weekly review
pub fn review_prompt(context: &str, total_captures: usize) -> String {
    format!(
        "You are a personal productivity assistant running a weekly review. Analyze the data below.

{context}
TOTAL CAPTURES THIS WEEK: {total_captures}

Use exactly this format and stay under 250 words:

**Week in Review**

**Quick Stats:**
- Items captured: [number]
- Breakdown: [x people, y projects, z ideas, w admin]

**What Moved Forward:**
- [Project or area that made progress]

**Open Loops:**
1. [Something blocked, stalled or waiting too long]

**Patterns:**
[One observation about recurring themes or where attention went]

**Suggested Focus for Next Week:**
1. [Concrete action for the highest priority]
2. [Second priority]
3. [Third priority]

**Items Needing Review:**
[Entries still marked NEEDS REVIEW, or say there are none]

Rules:
- Be analytical and concrete
- Call out projects with no movement in over a week
- Note unusually high or low capture volume
- Say so directly when something looks stuck"
    )
}
