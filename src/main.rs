use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use needledrop::catalog::Catalog;
use needledrop::features::FeatureVector;
use needledrop::paging::Page;
use needledrop::query::{Genre, Query};
use needledrop::recommend::recommend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "needledrop", version, about = "Audio-feature track recommender")]
struct Cli {
    /// Path to the catalog CSV
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend tracks closest to a target sound
    Recommend {
        /// Genre to search within
        #[arg(short, long, value_enum, default_value = "pop")]
        genre: Genre,

        /// First release year to include
        #[arg(long, default_value = "2015")]
        from_year: i32,

        /// Last release year to include
        #[arg(long, default_value = "2019")]
        to_year: i32,

        /// Acousticness target (0.0-1.0)
        #[arg(long, default_value = "0.5")]
        acousticness: f64,

        /// Danceability target (0.0-1.0)
        #[arg(long, default_value = "0.5")]
        danceability: f64,

        /// Energy target (0.0-1.0)
        #[arg(long, default_value = "0.5")]
        energy: f64,

        /// Instrumentalness target (0.0-1.0)
        #[arg(long, default_value = "0.0")]
        instrumentalness: f64,

        /// Positiveness (valence) target (0.0-1.0)
        #[arg(long, default_value = "0.45")]
        valence: f64,

        /// Tempo target in BPM (0.0-244.0)
        #[arg(long, default_value = "118.0")]
        tempo: f64,

        /// Zero-based page of results to show
        #[arg(short, long, default_value = "0")]
        page: usize,
    },

    /// List the recognized genres
    Genres,

    /// Show catalog statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = needledrop::config::AppConfig::load();

    if let Commands::Genres = cli.command {
        // No catalog needed to list the recognized set
        for genre in Genre::ALL {
            println!("{}", genre.label());
        }
        return Ok(());
    }

    // Resolve catalog path: CLI > config > default
    let catalog_path = cli
        .catalog
        .or(config.catalog_path.clone())
        .unwrap_or_else(needledrop::config::default_catalog_path);
    log::info!("Catalog: {}", catalog_path.display());

    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", catalog_path.display()))?;

    match cli.command {
        Commands::Recommend {
            genre,
            from_year,
            to_year,
            acousticness,
            danceability,
            energy,
            instrumentalness,
            valence,
            tempo,
            page,
        } => {
            let features = FeatureVector {
                acousticness,
                danceability,
                energy,
                instrumentalness,
                valence,
                tempo,
            };

            // Invalid queries are a user mistake, not a crash
            let query = match Query::new(genre, from_year, to_year, features) {
                Ok(q) => q,
                Err(e) => {
                    println!("Invalid query: {e}");
                    return Ok(());
                }
            };

            let ranking = recommend(&catalog, &query);
            if ranking.is_empty() {
                println!(
                    "No {} tracks between {} and {}.",
                    query.genre.label(),
                    query.year_start,
                    query.year_end
                );
                return Ok(());
            }

            let offset = page * config.page_size;
            let current = ranking.page(offset, config.page_size);

            println!(
                "{} tracks for {} [{}-{}], page {} of {}:",
                ranking.len(),
                query.genre.label(),
                query.year_start,
                query.year_end,
                page + 1,
                ranking.len().div_ceil(config.page_size),
            );
            println!();
            print_page(&current, offset);

            println!();
            if current.has_more {
                println!("More available: re-run with --page {}", page + 1);
            } else {
                println!("No more tracks to recommend.");
            }
        }

        Commands::Genres => unreachable!("handled before catalog load"),

        Commands::Stats => {
            let stats = catalog.stats();
            println!("Catalog Statistics");
            println!("==================");
            println!("Tracks:        {}", stats.tracks);
            println!("Catalog rows:  {}", stats.rows);
            if let (Some(min), Some(max)) = (stats.year_min, stats.year_max) {
                println!("Year span:     {min}-{max}");
            }
            println!();

            if !stats.genres.is_empty() {
                println!("Genres:");
                for (genre, count) in &stats.genres {
                    println!("  {:<20} {}", genre, count);
                }
            }
        }
    }

    Ok(())
}

/// Print one page of ranked tracks with their feature values.
fn print_page(page: &Page<'_>, offset: usize) {
    println!(
        "{:>4} {:<40} {:>5} {:>5} {:>5} {:>5} {:>5} {:>7}",
        "#", "Track URI", "Aco", "Dan", "Eng", "Ins", "Val", "Tempo"
    );
    println!("{}", "-".repeat(84));

    for (i, rec) in page.items.iter().enumerate() {
        // Truncate long URIs
        let uri: String = if rec.uri.len() > 40 {
            format!("{}...", &rec.uri[..37])
        } else {
            rec.uri.clone()
        };

        let f = &rec.features;
        println!(
            "{:>4} {:<40} {:>5.2} {:>5.2} {:>5.2} {:>5.2} {:>5.2} {:>7.1}",
            offset + i + 1,
            uri,
            f.acousticness,
            f.danceability,
            f.energy,
            f.instrumentalness,
            f.valence,
            f.tempo,
        );
    }

    // Legend
    println!();
    println!("Aco=Acousticness  Dan=Danceability  Eng=Energy");
    println!("Ins=Instrumentalness  Val=Valence  Tempo=BPM");
}
