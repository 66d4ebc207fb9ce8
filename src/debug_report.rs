use csscript::{Activation, Category, EffectCall, PropertyAction, RuleBlock, categories_for};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Outcome of the category gate for one call, as the engine would decide it.
enum Verdict {
    Runs,
    Incompatible,
    NotInTable,
}

fn verdict(property: &str, call: &EffectCall) -> Verdict {
    if categories_for(&call.name).is_empty() {
        return Verdict::NotInTable;
    }
    match Category::from_property(property) {
        Some(category) if category.permits(&call.name) => Verdict::Runs,
        _ => Verdict::Incompatible,
    }
}

pub fn print_report(source_name: &str, blocks: &[RuleBlock], color: bool) -> Summary {
    let palette = ansi::Palette::new(color);
    let mut summary = Summary::default();

    println!("\n{}", palette.bold(palette.paint(format!("⚙  Rules: {source_name}"), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Blocks ━━━", ansi::GRAY));
    if blocks.is_empty() {
        println!("{}", palette.dim("  No rule blocks recovered"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • The source has no `selector {{ ... }}` group");
        println!("  • Every block was unterminated or nameless");
    }

    for (idx, block) in blocks.iter().enumerate() {
        println!(
            "  {} {}",
            palette.paint(format!("[{idx}]"), ansi::GRAY),
            palette.bold(palette.paint(&block.selector, ansi::GREEN))
        );
        for clause in &block.triggers {
            summary.triggers += 1;
            let activation = Activation::resolve(&clause.name);
            println!(
                "      {} {}  {} {}",
                palette.paint(&clause.name, ansi::BLUE),
                palette.dim("│"),
                palette.dim("activation:"),
                palette.paint(activation.to_string(), ansi::CYAN)
            );
            for action in &clause.actions {
                print_action(action, &palette, &mut summary);
            }
        }
    }

    println!("\n{}", palette.paint("━━━ Summary ━━━", ansi::GRAY));
    println!(
        "  Blocks: {}  │  Triggers: {}  │  Calls: {}  │  Skipped: {}",
        palette.paint(blocks.len().to_string(), ansi::GREEN),
        palette.paint(summary.triggers.to_string(), ansi::CYAN),
        palette.paint(summary.calls.to_string(), ansi::BLUE),
        if summary.skipped > 0 {
            palette.paint(summary.skipped.to_string(), ansi::RED)
        } else {
            palette.dim("0")
        },
    );
    println!();

    summary
}

fn print_action(action: &PropertyAction, palette: &ansi::Palette, summary: &mut Summary) {
    println!("        {} {}", palette.paint(format!("{}:", action.property), ansi::YELLOW), palette.dim(&action.value));
    for call in action.effect_calls() {
        summary.calls += 1;
        let mark = match verdict(&action.property, &call) {
            Verdict::Runs => palette.paint("✓ runs", ansi::GREEN),
            Verdict::Incompatible => {
                summary.skipped += 1;
                palette.paint(format!("✗ not allowed on `{}`", action.property), ansi::RED)
            }
            Verdict::NotInTable => {
                summary.skipped += 1;
                palette.paint("✗ unknown effect", ansi::RED)
            }
        };
        println!("          {} {}", palette.paint(call.to_string(), ansi::CYAN), mark);
    }
}

#[derive(Debug, Default)]
pub struct Summary {
    pub triggers: usize,
    pub calls: usize,
    pub skipped: usize,
}
