use std::io::{BufRead, Write};

use clap::{Parser, ValueEnum};
use log::info;

use genresplit::clients::{
    SpotifyClient,
    errors::{Error, Result},
};
use genresplit::genres::SplitMode;
use genresplit::splitter::{ConfigBuilder, Splitter};

use crate::prompt::Prompter;

#[derive(Parser, Debug)]
#[command(name = "genresplit")]
#[command(version, about = "Split a Spotify playlist into one playlist per genre", long_about = None)]
struct Cli {
    /// User the new playlists are created for
    #[arg(long, env = "SPOTIFY_USER")]
    user: Option<String>,

    /// Source playlist id or URI
    #[arg(long)]
    playlist: Option<String>,

    #[arg(long, env = "RSPOTIFY_CLIENT_ID")]
    client_id: Option<String>,

    #[arg(long, env = "RSPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Put each track in every genre of its artists, or only in its top genre
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Number of playlists to create in top mode
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Prefix for the names of the new playlists
    #[arg(long, default_value = "")]
    prefix: String,

    /// Show the genre buckets without creating playlists
    #[arg(long)]
    dry_run: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ModeArg {
    All,
    Top,
}

// Everything a run needs, after flags, environment and prompts are merged
#[derive(Debug, PartialEq, Eq)]
struct Settings {
    user: String,
    playlist: String,
    client_id: String,
    client_secret: String,
    mode: SplitMode,
    prefix: String,
    dry_run: bool,
}

fn resolve<R: BufRead, W: Write>(cli: Cli, prompter: &mut Prompter<R, W>) -> Result<Settings> {
    let mut answer = |value: Option<String>, question: &str| match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
        _ => prompter.ask_required(question),
    };
    let user = answer(cli.user, "Enter your username:")?;
    let playlist = answer(cli.playlist, "Enter your playlist-id:")?;
    let client_id = answer(cli.client_id, "Enter your client-id:")?;
    let client_secret = answer(cli.client_secret, "Enter your client-secret:")?;

    let mode = match (cli.mode, cli.top) {
        (Some(ModeArg::All), Some(_)) => {
            return Err(Error::ConfigurationError(
                "--top only applies to --mode top".into(),
            ));
        }
        (Some(ModeArg::All), None) => SplitMode::AllGenres,
        (Some(ModeArg::Top) | None, Some(n)) => SplitMode::TopGenres { limit: Some(n) },
        (Some(ModeArg::Top), None) => SplitMode::TopGenres { limit: None },
        (None, None) => prompter.ask_mode()?,
    };

    Ok(Settings {
        user,
        playlist,
        client_id,
        client_secret,
        mode,
        prefix: cli.prefix,
        dry_run: cli.dry_run,
    })
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // The stdin lock is released before the OAuth prompt reads from it
    let settings = {
        let stdin = std::io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
        resolve(cli, &mut prompter)?
    };
    split_playlist(settings).await
}

async fn split_playlist(settings: Settings) -> Result<()> {
    info!("Building config ...");
    let spotify = SpotifyClient::with_credentials(&settings.client_id, &settings.client_secret);
    let config = ConfigBuilder::new(spotify, settings.user, settings.playlist)
        .mode(settings.mode)
        .name_prefix(settings.prefix)
        .dry_run(settings.dry_run)
        .build()?;

    info!("Authorizing Spotify client ...");
    // CLI prompts may be shown on this call
    config.service.authorize_client().await?;

    let report = Splitter::new(config).split().await?;
    for bucket in &report.buckets {
        info!("{}: {} tracks", bucket.genre, bucket.track_ids.len());
    }
    info!(
        "Split completed. Read {} tracks from {} artists, created {} playlists",
        report.tracks_read,
        report.artists_looked_up,
        report.playlists.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(answers: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn prompts_for_everything_in_order() {
        let cli = Cli::try_parse_from([
            "genresplit",
            "--user",
            "",
            "--client-id",
            "",
            "--client-secret",
            "",
        ])
        .unwrap();
        let mut p = prompter("alice\n37i9dQZF1DXcBWIGoYBM5M\nid\nsecret\nyes\n");

        let settings = resolve(cli, &mut p).unwrap();

        assert_eq!(
            settings,
            Settings {
                user: "alice".into(),
                playlist: "37i9dQZF1DXcBWIGoYBM5M".into(),
                client_id: "id".into(),
                client_secret: "secret".into(),
                mode: SplitMode::AllGenres,
                prefix: String::new(),
                dry_run: false,
            }
        );
    }

    #[test]
    fn flags_skip_prompts() {
        let cli = Cli::try_parse_from([
            "genresplit",
            "--user",
            "alice",
            "--playlist",
            "spotify:playlist:37i9dQZF1DXcBWIGoYBM5M",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--top",
            "3",
            "--prefix",
            "Genre: ",
            "--dry-run",
        ])
        .unwrap();
        // No answers available, any prompt would fail
        let mut p = prompter("");

        let settings = resolve(cli, &mut p).unwrap();

        assert_eq!(settings.mode, SplitMode::TopGenres { limit: Some(3) });
        assert_eq!(settings.prefix, "Genre: ");
        assert!(settings.dry_run);
    }

    #[test]
    fn top_count_with_all_mode_is_rejected() {
        let cli = Cli::try_parse_from([
            "genresplit",
            "--user",
            "alice",
            "--playlist",
            "p",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--mode",
            "all",
            "--top",
            "2",
        ])
        .unwrap();

        assert!(matches!(
            resolve(cli, &mut prompter("")),
            Err(Error::ConfigurationError(_))
        ));
    }
}
