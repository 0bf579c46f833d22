use avatar_forge::cache::{Cache, FileCache};
use avatar_forge::config::{self, AvatarConfig};
use avatar_forge::store::AvatarStore;
use avatar_forge::styles::{self, Style};
use avatar_forge::{identity, output, raster};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

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
#[command(name = "avatar-forge")]
#[command(about = "Deterministic avatars from a seed or e-mail hash")]
#[command(long_about = "\
Deterministic avatars from a seed or e-mail hash

The same seed always gives the same avatar. Parts-based styles composite
artwork from a parts directory; vector styles need no artwork.

Parts directory layout (one per style, see config.toml):

  parts/monster-id/
  ├── arms_1.png          # <parttype>_<variant>.png
  ├── arms_S8.png
  ├── body_1.png
  └── ...

Styles:
  monster, wavatar, cat, bird    PNG, composited from parts
  robohash                       SVG, assembled from fragment parts
  retro, rings                   SVG, no parts needed

Run 'avatar-forge gen-config' to generate a documented config.toml.
Set RUST_LOG=debug to see inventory cache activity.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding config.toml; relative config paths resolve here
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build one avatar and write it to a file
    Generate {
        /// Avatar style
        #[arg(long, value_enum, default_value_t = Style::Monster)]
        style: Style,
        /// Seed string, typically a hex hash
        #[arg(long, required_unless_present = "email", conflicts_with = "email")]
        seed: Option<String>,
        /// Derive the seed from this e-mail address
        #[arg(long)]
        email: Option<String>,
        /// Salt mixed into the e-mail hash
        #[arg(long, default_value = "", requires = "email")]
        salt: String,
        /// Size in pixels (default from config)
        #[arg(long)]
        size: Option<u32>,
        /// Output file (default: <seed>-<size>.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the part inventory of a parts-based style
    Inventory {
        #[arg(long, value_enum, default_value_t = Style::Monster)]
        style: Style,
    },
    /// Compute recoloring bounds for the monster parts and save them as JSON
    Dimensions {
        /// Output file (default: monster-bounds.json under the root)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Generate {
            style,
            seed,
            email,
            salt,
            size,
            out,
        } => {
            let config = config::load_config(&cli.root)?;
            let seed = match (seed, email) {
                (Some(seed), _) => seed,
                (None, Some(email)) => identity::hash_email(&email, &salt),
                (None, None) => return Err("either --seed or --email is required".into()),
            };
            let size = size.unwrap_or(config.output.default_size);
            if size == 0 || size > config::MAX_SIZE {
                return Err(format!("--size must be 1-{}", config::MAX_SIZE).into());
            }

            let cache = inventory_cache(&config, &cli.root);
            let mut generator = styles::create(style, &config, &cli.root, cache)?;
            let avatar = match &config.output.store_dir {
                Some(dir) => AvatarStore::new(config::resolve_path(&cli.root, dir))
                    .get_or_build(style, &seed, size, generator.as_mut())?,
                None => generator.build(&seed, size),
            };
            let Some(avatar) = avatar else {
                return Err(
                    format!("could not generate a {style} avatar, see the log above").into(),
                );
            };

            let dest = out.unwrap_or_else(|| {
                PathBuf::from(format!("{}-{}.{}", seed, size, avatar.extension()))
            });
            std::fs::write(&dest, avatar.as_bytes())?;
            output::print_generate(style, size, &avatar, &dest);
        }
        Command::Inventory { style } => {
            let config = config::load_config(&cli.root)?;
            let cache = inventory_cache(&config, &cli.root);
            let Some(mut inventory) = styles::style_inventory(style, &config, &cli.root, cache)
            else {
                return Err(format!("{style} does not use parts").into());
            };
            let dir = inventory.dir().to_path_buf();
            let parts = inventory.get_parts()?;
            output::print_inventory(style, &dir, parts);
        }
        Command::Dimensions { out } => {
            let config = config::load_config(&cli.root)?;
            let cache = inventory_cache(&config, &cli.root);
            let Some(inventory) = styles::style_inventory(Style::Monster, &config, &cli.root, cache)
            else {
                return Err("monster style has no parts directory".into());
            };
            // Always rescan: the table must match the files on disk
            let parts = inventory.build_parts()?;
            let dimensions = raster::get_parts_dimensions(inventory.dir(), &parts)?;

            let dest = out.unwrap_or_else(|| cli.root.join("monster-bounds.json"));
            std::fs::write(&dest, serde_json::to_string_pretty(&dimensions)?)?;
            output::print_dimensions(&dimensions, &dest);
            if config.monster.bounds_file.is_none() {
                println!("Set [monster] bounds_file in config.toml to use it");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only command output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn inventory_cache(config: &AvatarConfig, root: &Path) -> Arc<dyn Cache> {
    Arc::new(FileCache::new(config::resolve_path(
        root,
        &config.inventory.cache_dir,
    )))
}
