use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "yt-transcript",
    about = "Fetch the transcript of a YouTube video as a single JSON object",
    version,
    long_about = "Resolves a YouTube URL or bare video ID, downloads its transcript (preferring English, falling back to the first available track) and prints {videoId, title, filename, transcript} as JSON. Proxy credentials are read from WEBSHARE_USER / WEBSHARE_PASS."
)]
pub struct Cli {
    /// YouTube URL (watch, youtu.be, embed, shorts, live) or 11-character video ID
    #[arg(value_name = "URL_OR_ID")]
    pub input: Option<String>,

    /// Configuration file (defaults to ./config.yaml, then the user config directory)
    #[arg(short, long, value_name = "FILE", env = "YT_TRANSCRIPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_input() {
        let cli = Cli::try_parse_from(["yt-transcript", "-v", "dQw4w9WgXcQ"]).unwrap();
        assert_eq!(cli.input.as_deref(), Some("dQw4w9WgXcQ"));
        assert!(cli.verbose);
    }
}
