use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use vybe::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeOptions),

    /// Print group join codes
    Codes(CodesOptions),

    /// Print a random UUID
    Uuid,

    /// Turn text into a URL-safe slug
    Slug(SlugOptions),

    /// Normalize a Spotify id, URI or link into a Spotify URI
    SpotifyUri(SpotifyUriOptions),

    /// Split a YouTube video title into artist and track
    Title(TitleOptions),

    /// Manage the captured YouTube Music session
    Ytm(YtmOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, overrides APP_SERVER_ADDRESS
    #[clap(long)]
    pub address: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CodesOptions {
    /// How many codes to generate
    #[clap(short = 'n', long = "num", default_value_t = 1)]
    pub num: usize,

    /// Code length, defaults to APP_CODE_LENGTH
    #[clap(long)]
    pub length: Option<usize>,

    /// Include special characters (!@#$%&*?)
    #[clap(long)]
    pub specials: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SlugOptions {
    pub text: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SpotifyUriOptions {
    pub input: String,

    /// Kind assumed for bare ids
    #[clap(long, default_value = "track")]
    pub kind: String,
}

#[derive(Parser, Debug, Clone)]
pub struct TitleOptions {
    pub title: String,

    /// Uploading channel, used as artist when the title has none
    #[clap(long)]
    pub channel: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct YtmOptions {
    #[command(subcommand)]
    pub command: YtmSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum YtmSubcommand {
    /// Open YouTube Music so the extension can capture a session
    Connect,
    /// Delete the captured headers
    Disconnect,
    /// Show which headers are captured
    Status,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

impl Command {
    /// Whether the command reads the `APP_` configuration.
    fn needs_settings(&self) -> bool {
        matches!(
            self,
            Command::Serve(_) | Command::Codes(_) | Command::Ytm(_)
        )
    }
}

fn load_settings() -> config::Settings {
    match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.command.needs_settings() {
        if let Err(e) = config::load_env().await {
            error!("Cannot load environment. Err: {}", e);
        }
    }

    match cli.command {
        Command::Serve(opt) => cli::serve(load_settings(), opt.address).await,
        Command::Codes(opt) => cli::codes(&load_settings(), opt.num, opt.length, opt.specials),
        Command::Uuid => cli::uuid(),
        Command::Slug(opt) => cli::slug(&opt.text),
        Command::SpotifyUri(opt) => cli::spotify_uri(&opt.input, &opt.kind),
        Command::Title(opt) => cli::title(&opt.title, opt.channel.as_deref()),
        Command::Ytm(opt) => {
            let settings = load_settings();
            match opt.command {
                YtmSubcommand::Connect => cli::ytm_connect(&settings),
                YtmSubcommand::Disconnect => cli::ytm_disconnect(&settings).await,
                YtmSubcommand::Status => cli::ytm_status(&settings).await,
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
