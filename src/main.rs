use card_sheet::fonts::{FetchingFontCache, FontResolver, LocalFontCache};
use card_sheet::{config, document, output, scan};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Shared flags for commands that read an image directory.
#[derive(clap::Args, Clone)]
struct InputArgs {
    /// Directory containing the character images
    image_dir: PathBuf,

    /// TOML config file (default: built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "card-sheet")]
#[command(about = "Printable PDF sheets of guessing-game character cards")]
#[command(long_about = "\
Printable PDF sheets of guessing-game character cards

Every image in a folder becomes one card: the picture on the front with a
name label underneath, a decorative back on the following page. Backs are
mirrored so that printing duplex (flip on long edge) lines each back up
behind its front.

Card names come from file names:

  anna_smith.png      →  \"Anna Smith\"
  uncle-bob.jpg       →  \"Uncle Bob\"
  7-of-nine.png       →  \"7 Of Nine\"

Run 'card-sheet gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the card PDF
    Build {
        #[command(flatten)]
        input: InputArgs,

        /// Output PDF file
        #[arg(short, long, default_value = "guess_who_cards.pdf")]
        output: PathBuf,

        /// Never download fonts; use standard fonts and the local font cache only
        #[arg(long)]
        offline: bool,
    },
    /// Validate the config and image directory and show the page plan
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write a stock config.toml with all options documented
    GenConfig {
        /// Destination file (prints to stdout when omitted)
        file: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            input,
            output: output_path,
            offline,
        } => {
            let config = config::load_config(input.config.as_deref())?;
            let items = collect_cards(&input.image_dir, &config)?;

            let fonts: Box<dyn FontResolver> = if config.fonts.fetch && !offline {
                Box::new(FetchingFontCache::new(&config.fonts.cache_dir)?)
            } else {
                Box::new(LocalFontCache::new(&config.fonts.cache_dir))
            };

            println!("==> Rendering {}", output_path.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_render_event(&event);
                }
            });
            let result = document::generate(&items, &config, &output_path, fonts.as_ref(), Some(tx));
            printer.join().ok();
            let summary = result?;
            output::print_summary(&summary, &output_path);
        }
        Command::Check { input } => {
            let config = config::load_config(input.config.as_deref())?;
            let items = collect_cards(&input.image_dir, &config)?;
            output::print_layout_plan(items.len(), &config);
            println!("==> Cards are valid");
        }
        Command::GenConfig { file } => match file {
            Some(path) => {
                std::fs::write(&path, config::stock_config_toml())?;
                println!("Default config written to: {}", path.display());
            }
            None => print!("{}", config::stock_config_toml()),
        },
    }

    Ok(())
}

/// Scan the image directory, apply the card cap and report what was found.
fn collect_cards(
    image_dir: &Path,
    config: &config::CardConfig,
) -> Result<Vec<scan::CardItem>, scan::ScanError> {
    println!("==> Scanning {}", image_dir.display());
    let found = scan::collect_images(image_dir, &config.normalized_extensions())?;
    let (items, count) = scan::limit_cards(found, config.game.max_cards);
    output::print_card_count(&count);
    output::print_scan_output(&items);
    output::print_grid_overflow(config);
    Ok(items)
}
