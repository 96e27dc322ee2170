use std::path::{Path, PathBuf};

use clap::Parser;

use crate::analyzer::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Directory holding index.html and the wasm package.
    #[arg(long, env = "PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Without a key every analysis request fails.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,
    /// Upper bound for an analysis request, which carries the PNG snapshot.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
    #[arg(long, env = "TLS_CERT", requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,
    #[arg(long, env = "TLS_KEY", requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,
}

impl Args {
    pub fn public_dir(&self) -> PathBuf {
        self.public_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"))
    }

    pub fn tls_paths(&self) -> Option<(&Path, &Path)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flags() {
        let args = Args::try_parse_from([
            "pixel_debate_server",
            "--port",
            "8080",
            "--gemini-model",
            "gemini-test",
            "--max-body-bytes",
            "1024",
            "--public-dir",
            "/srv/debate",
        ])
        .unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.gemini_model, "gemini-test");
        assert_eq!(args.max_body_bytes, 1024);
        assert_eq!(args.public_dir(), PathBuf::from("/srv/debate"));
        assert!(args.tls_paths().is_none());
    }

    #[test]
    fn test_tls_flags_come_in_pairs() {
        assert!(Args::try_parse_from(["pixel_debate_server", "--tls-cert", "cert.pem"]).is_err());
        let args = Args::try_parse_from([
            "pixel_debate_server",
            "--tls-cert",
            "cert.pem",
            "--tls-key",
            "key.pem",
        ])
        .unwrap();
        let (cert, key) = args.tls_paths().unwrap();
        assert_eq!(cert, Path::new("cert.pem"));
        assert_eq!(key, Path::new("key.pem"));
    }
}
