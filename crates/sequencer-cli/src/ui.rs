//! Sequencer CLI UI primitives.
//!
//! Results go to stdout; the loaded-patch listing goes to stderr so a
//! redirected JSON document stays clean.

use console::style;

use patch_sequencer::validate::Violation;
use patch_sequencer::{Patch, ScheduleOutcome};

/// Color palette
pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const AMBER: Color = Color::Color256(214);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}"; // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}"; // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}"; // ◉
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const DOT: &str = "\u{00B7}"; // ·
    pub const ARROW: &str = "\u{2500}\u{25B8}"; // ─▸
}

const BOX_WIDTH: usize = 55;

/// Section title, used to separate the two demo runs.
pub fn section(title: &str) {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::CYAN),
        style(title).fg(colors::CYAN).bold()
    );
    println!();
}

pub fn success(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        msg
    );
}

pub fn error(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA),
        style(msg).fg(colors::MAGENTA)
    );
}

pub fn warning(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND_OUTLINE).fg(colors::AMBER),
        msg
    );
}

pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

pub fn box_header(title: &str) {
    let title_padded = format!(" {} ", title);
    let dashes = BOX_WIDTH.saturating_sub(title_padded.chars().count() + 4);

    println!(
        "  {}{}{}{}",
        style("\u{256D}\u{2500}").fg(colors::CYAN), // ╭─
        style(title_padded).fg(colors::CYAN).bold(),
        style("\u{2500}".repeat(dashes)).fg(colors::CYAN),
        style("\u{256E}").fg(colors::CYAN) // ╮
    );
}

/// Box row. `content` must be unstyled so padding lines up.
pub fn box_line(content: &str) {
    let padding = (BOX_WIDTH - 2).saturating_sub(content.chars().count());
    println!(
        "  {} {}{}{}",
        style("\u{2502}").fg(colors::CYAN), // │
        content,
        " ".repeat(padding),
        style("\u{2502}").fg(colors::CYAN)
    );
}

pub fn box_footer() {
    println!(
        "  {}{}{}",
        style("\u{2570}").fg(colors::CYAN), // ╰
        style("\u{2500}".repeat(BOX_WIDTH - 2)).fg(colors::CYAN),
        style("\u{256F}").fg(colors::CYAN) // ╯
    );
}

/// "Nope" header for failed checks.
pub fn nope_header() {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA).bold(),
        style("Nope.").fg(colors::MAGENTA).bold()
    );
    println!();
}

pub fn looking_good() {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        style("Looking good.").bold()
    );
}

/// One summary row per patch, written to stderr.
pub fn patch_summary(source: &str, patches: &[Patch]) {
    eprintln!(
        "  {} Loaded {} patches from {}",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        patches.len(),
        source
    );
    for patch in patches {
        eprintln!("  {}", style(patch_row(patch)).fg(colors::DIM));
    }
}

fn patch_row(patch: &Patch) -> String {
    format!(
        "- {} | {} | conf={} | impact={} | deps={} | affects={}",
        patch.id,
        patch.classification,
        patch.confidence,
        patch.impact,
        patch.dependencies.len(),
        patch.affects.len()
    )
}

/// Human-readable rendering of a scheduling result.
pub fn outcome(outcome: &ScheduleOutcome) {
    match outcome {
        ScheduleOutcome::Blocked { cycles, .. } => {
            error(&format!("Blocked by {} dependency cycle(s)", cycles.len()));
            println!();
            box_header(&format!("{} Cycles", symbols::DIAMOND));
            box_line("");
            for cycle in cycles {
                box_line(&format!("  {}", cycle.join(" \u{2194} ")));
            }
            box_line("");
            box_footer();
        }
        ScheduleOutcome::Ok { layers, phases, .. } => {
            success(&format!(
                "Scheduled {} patches in {} layer(s)",
                layers.iter().map(Vec::len).sum::<usize>(),
                layers.len()
            ));
            println!();

            box_header(&format!("{} Layers", symbols::ARROW));
            box_line("");
            for (i, layer) in layers.iter().enumerate() {
                box_line(&format!("  {:>2}  {}", i + 1, layer.join(", ")));
            }
            box_line("");
            box_footer();
            println!();

            box_header(&format!("{} Phases", symbols::ARROW));
            box_line("");
            for group in phases {
                let ids = if group.patch_ids.is_empty() {
                    symbols::DOT.to_string()
                } else {
                    group.patch_ids.join(", ")
                };
                box_line(&format!("  {:<12}{}", group.phase.as_str(), ids));
            }
            box_line("");
            box_footer();
        }
    }

    let unmatched = outcome.unmatched();
    if !unmatched.is_empty() {
        println!();
        warning(&format!("{} unmatched dependenc(ies)", unmatched.len()));
        for entry in unmatched {
            dim(&format!(
                "   {} {} needs {}",
                symbols::TRIANGLE,
                entry.patch_id,
                entry.dependency
            ));
        }
    }
    println!();
}

/// Lists strict-schema violations.
pub fn violations(source: &str, violations: &[Violation]) {
    nope_header();
    box_header(&format!("{} Schema violations", symbols::DIAMOND));
    box_line("");
    box_line(source);
    box_line("");
    for violation in violations {
        box_line(&format!("  {}", violation));
    }
    box_line("");
    box_footer();
    println!();
}
