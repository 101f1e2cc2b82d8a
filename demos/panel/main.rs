use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use clap::{Parser, Subcommand};
use goboard_panel::{
    BoardClient, GameSetup, OnlineGoPanel, StoneColor, SyncState, WifiPanel,
};

#[derive(Parser)]
#[command(author, version, about = "Go board settings panel", long_about = None)]
struct Cli {
    /// Base URL of the board.
    #[arg(short = 'd', long, env = "GOBOARD_URL", default_value = goboard_panel::DEFAULT_DEVICE_URL)]
    device_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "GOBOARD_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show Wi-Fi and online-go status.
    Status,
    /// Replace the Wi-Fi credentials. The board restarts afterwards.
    Wifi {
        #[arg(long)]
        ssid: String,
        #[arg(long, env = "GOBOARD_WIFI_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Store a new online-go login.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "GOBOARD_OGS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List the games of the stored account.
    Games,
    /// Pick a game and stone colors.
    Setup {
        #[arg(long)]
        game: u64,
        #[arg(long)]
        color: StoneColor,
        #[arg(long)]
        opponent_color: StoneColor,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let client = BoardClient::builder()
        .device_url(&cli.device_url)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => {
            let mut wifi = WifiPanel::new(client.wifi());
            let mut online_go = OnlineGoPanel::new(client.online_go());
            wifi.refresh().await;
            online_go.refresh().await;

            println!("Wifi Credentials [{}]", wifi.badge().text);
            if let Some(status) = wifi.status() {
                println!("  SSID:     {}", status.ssid);
                println!("  Password: {}", status.masked_password().unwrap_or_default());
            }

            println!("Online Go Account [{}]", online_go.badge().text);
            if let Some(status) = online_go.status().and_then(|s| s.status()) {
                println!("  Username: {}", status.username);
                println!("  Password: {}", status.masked_password().unwrap_or_default());
            }
        }
        Commands::Wifi { ssid, password, yes } => {
            let mut panel = WifiPanel::new(client.wifi());
            panel.refresh().await;
            panel.edit_identifier(ssid);
            panel.edit_password(password);

            let confirmation = panel.request_save();
            println!("{}", confirmation.message());
            if yes || prompt(&format!("Save & restart with '{}'?", confirmation.edits().identifier))? {
                match confirmation.confirm().await {
                    SyncState::PendingRestart => println!("Saved. The board is restarting."),
                    SyncState::Loaded(status) => println!("Saved. SSID: {}", status.ssid),
                    SyncState::SaveError { message, .. } => println!("Save failed: {message}"),
                    _ => {}
                }
            } else {
                confirmation.cancel();
                println!("Cancelled.");
            }
        }
        Commands::Login { username, password } => {
            let mut panel = OnlineGoPanel::new(client.online_go());
            panel.edit_identifier(username);
            panel.edit_password(password);
            if let SyncState::SaveError { message, .. } = panel.save().await {
                println!("Save failed: {message}");
            }
            println!("Online Go Account [{}]", panel.badge().text);
        }
        Commands::Games => {
            let games = client.games().list().await?;
            if games.is_empty() {
                println!("No active games found.");
            }
            for game in games {
                println!("{:<10} {}", game.id, game.label());
            }
        }
        Commands::Setup {
            game,
            color,
            opponent_color,
        } => {
            let setup = GameSetup::builder()
                .game_id(game)
                .player_color(color)
                .opponent_color(opponent_color)
                .build()?;
            println!(
                "Game {}: you play {}, opponent plays {}",
                setup.game_id, setup.player_color, setup.opponent_color
            );
        }
    }

    Ok(())
}

fn prompt(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
