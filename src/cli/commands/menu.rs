//! `partsmith menu` command - numbered example prompts

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::generate::generate;
use crate::cli::GlobalOpts;

/// Prompts offered by the menu, numbered from 1
pub const EXAMPLE_PROMPTS: &[&str] = &[
    "Design an aluminum suspension arm 150mm long, 50mm wide, supports 2000N, 3-bolt mount",
    "Make a steel plate 80mm diameter with 4 holes 6mm, thickness 6mm",
    "create a rectangle bar 200mm length and 30mm width with 2 bolt holes",
];

#[derive(clap::Args, Debug)]
pub struct MenuArgs {
    /// Menu entry: 1..=N for an example, 0 for a custom prompt
    #[arg(long, short = 'c')]
    pub choice: Option<String>,

    /// Custom prompt used with choice 0
    #[arg(long)]
    pub prompt: Option<String>,
}

/// What a menu entry resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPick {
    Example(usize),
    Custom,
}

impl MenuPick {
    /// Interpret a typed choice; anything unrecognized picks the first example
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim().parse::<usize>() {
            Ok(0) => MenuPick::Custom,
            Ok(n) if n <= EXAMPLE_PROMPTS.len() => MenuPick::Example(n - 1),
            _ => MenuPick::Example(0),
        }
    }
}

pub fn run(args: MenuArgs, global: &GlobalOpts) -> Result<()> {
    let pick = match &args.choice {
        Some(choice) => {
            let pick = MenuPick::from_choice(choice);
            if !global.quiet {
                print_menu();
            }
            pick
        }
        None => select_interactively()?,
    };

    let prompt = match pick {
        MenuPick::Example(index) => EXAMPLE_PROMPTS[index].to_string(),
        MenuPick::Custom => match args.prompt {
            Some(prompt) => prompt,
            None => Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("Prompt")
                .interact_text()
                .into_diagnostic()?,
        },
    };

    if !global.quiet {
        println!("{} {}", style("⚙").cyan(), prompt.trim());
    }
    generate(prompt.trim(), global)
}

fn print_menu() {
    println!("{}", style("Choose an example prompt or enter your own:").bold());
    for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
        println!("  {} {}", style(format!("{}.", i + 1)).cyan(), prompt);
    }
    println!("  {} Enter custom prompt", style("0.").cyan());
}

fn select_interactively() -> Result<MenuPick> {
    let mut items: Vec<String> = EXAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect();
    items.push("Enter custom prompt".to_string());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Choose an example prompt or enter your own")
        .items(&items)
        .default(0)
        .interact()
        .into_diagnostic()?;

    Ok(if selection == EXAMPLE_PROMPTS.len() {
        MenuPick::Custom
    } else {
        MenuPick::Example(selection)
    })
}
