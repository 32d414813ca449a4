use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_recommender::engine::{not_found_message, DEFAULT_DIVERSITY, DEFAULT_K};
use song_recommender::materialize::display_title;
use song_recommender::store::{self, DataDir};
use song_recommender::{RecommendRequest, Strategy, Weighting};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recommend songs similar to a track
    Recommend(RecommendArgs),
    /// List the strategies available for a track
    Strategies(TrackArgs),
    /// Start the recommendation HTTP API
    Serve(ServeArgs),
    /// Assemble dataset bundles from JSON parts
    Pack(PackArgs),
    /// Print bundle statistics
    Inspect(DataArgs),
}

#[derive(Parser, Debug)]
struct DataArgs {
    /// Directory containing content.bin and collaborative.bin
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct TrackArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Song name
    #[arg(short, long)]
    name: String,

    /// Artist name
    #[arg(short, long)]
    artist: String,
}

#[derive(Parser, Debug)]
struct RecommendArgs {
    #[command(flatten)]
    track: TrackArgs,

    /// content, collaborative or hybrid (defaults to hybrid when available)
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Number of recommendations
    #[arg(short, long, default_value_t = DEFAULT_K)]
    k: usize,

    /// Diversity 1-10 for the hybrid strategy; higher leans on listeners
    #[arg(long, default_value_t = DEFAULT_DIVERSITY)]
    diversity: u8,

    /// Explicit content weight in [0, 1]; overrides --diversity
    #[arg(long)]
    content_weight: Option<f64>,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Address to bind
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

#[derive(Parser, Debug)]
struct PackArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Full catalog JSON (array of {name, artist, spotify_preview_url})
    #[arg(long)]
    catalog: PathBuf,

    /// Content feature matrix JSON (CSR)
    #[arg(long)]
    content_matrix: PathBuf,

    /// Filtered catalog JSON, same row order as the interaction matrix
    #[arg(long)]
    filtered_catalog: PathBuf,

    /// Track id JSON array, same row order as the filtered catalog
    #[arg(long)]
    track_ids: PathBuf,

    /// Item x user interaction matrix JSON (CSR)
    #[arg(long)]
    interaction_matrix: PathBuf,

    /// Hybrid content matrix JSON (CSR), aligned to the filtered catalog
    #[arg(long)]
    hybrid_matrix: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    match cli.command {
        Commands::Recommend(args) => run_recommend(args),
        Commands::Strategies(args) => run_strategies(args),
        Commands::Serve(args) => run_serve(args).await,
        Commands::Pack(args) => run_pack(args),
        Commands::Inspect(args) => run_inspect(args),
    }
}

fn run_recommend(args: RecommendArgs) -> Result<()> {
    let recommender = DataDir::new(&args.track.data.data_dir).load_recommender()?;
    let TrackArgs { name, artist, .. } = args.track;

    let strategy = args
        .strategy
        .unwrap_or_else(|| recommender.default_strategy(&name, &artist));
    let weighting = match args.content_weight {
        Some(w) => Weighting::ContentWeight(w),
        None => Weighting::Diversity(args.diversity),
    };
    let request = RecommendRequest::new(name, artist, strategy)
        .with_k(args.k)
        .with_weighting(weighting);

    let recommendations = match recommender.recommend(&request) {
        Ok(r) => r,
        Err(e) if e.is_not_found() => {
            println!("{}", not_found_message(&request.name));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    println!(
        "Recommendations for {} by {} ({})",
        display_title(&request.name),
        display_title(&request.artist),
        strategy.label()
    );
    for rec in &recommendations {
        let title = display_title(&rec.track.name);
        let artist = display_title(&rec.track.artist);
        match rec.role.heading() {
            Some(heading) if rec.rank == 0 => {
                println!("\n## {}", heading);
                println!("{} by {}", title, artist);
            }
            Some(heading) => {
                println!("\n### {}", heading);
                println!("{}. {} by {}", rec.rank, title, artist);
            }
            None => println!("{}. {} by {}", rec.rank, title, artist),
        }
        println!("   {}  (score {:.4})", rec.track.preview_audio_ref, rec.score);
    }
    Ok(())
}

fn run_strategies(args: TrackArgs) -> Result<()> {
    let recommender = DataDir::new(&args.data.data_dir).load_recommender()?;
    if !recommender.content().catalog().contains(&args.name, &args.artist) {
        println!("{}", not_found_message(&args.name));
        return Ok(());
    }
    let default = recommender.default_strategy(&args.name, &args.artist);
    for strategy in recommender.available_strategies(&args.name, &args.artist) {
        let marker = if strategy == default { " (default)" } else { "" };
        println!("{}: {}{}", strategy, strategy.label(), marker);
    }
    Ok(())
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let recommender = Arc::new(DataDir::new(&args.data.data_dir).load_recommender()?);
    let addr = SocketAddr::new(args.bind, args.port);
    song_recommender::server::start_server(recommender, addr).await
}

fn run_pack(args: PackArgs) -> Result<()> {
    let dir = DataDir::new(&args.data.data_dir);

    let content = store::pack_content(&args.catalog, &args.content_matrix)?;
    store::save_bundle(&content, &dir.content_path())?;
    println!(
        "Wrote {:?} ({} tracks)",
        dir.content_path(),
        content.catalog().len()
    );

    let collaborative = store::pack_collaborative(
        &args.filtered_catalog,
        &args.track_ids,
        &args.interaction_matrix,
        &args.hybrid_matrix,
    )?;
    store::save_bundle(&collaborative, &dir.collaborative_path())?;
    println!(
        "Wrote {:?} ({} tracks)",
        dir.collaborative_path(),
        collaborative.catalog().len()
    );
    Ok(())
}

fn run_inspect(args: DataArgs) -> Result<()> {
    let dir = DataDir::new(&args.data_dir);
    let content = dir.load_content()?;
    let collaborative = dir.load_collaborative()?;

    println!("Content bundle: {:?}", dir.content_path());
    println!("  tracks:   {}", content.catalog().len());
    println!("  features: {}", content.features().cols());
    println!("  nnz:      {}", content.features().nnz());
    println!("Collaborative bundle: {:?}", dir.collaborative_path());
    println!("  tracks:          {}", collaborative.catalog().len());
    println!("  users:           {}", collaborative.interactions().cols());
    println!("  interactions:    {}", collaborative.interactions().nnz());
    println!("  hybrid features: {}", collaborative.hybrid_features().cols());
    Ok(())
}
