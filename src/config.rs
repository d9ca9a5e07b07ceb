use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use std::{env, fmt};

/// Which storage binding to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// An S3-compatible provider.
    S3,
    /// A process-local bucket that forgets everything on exit.
    Memory,
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments; built once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub backend: Backend,
    pub bucket: Option<String>,
    pub public_url: String,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub force_path_style: bool,
    pub list_all_pages: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

// Hand-written so credentials never reach the logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("backend", &self.backend)
            .field("bucket", &self.bucket)
            .field("public_url", &self.public_url)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .field("list_all_pages", &self.list_all_pages)
            .field(
                "credentials",
                &if self.access_key_id.is_some() {
                    "<explicit>"
                } else {
                    "<default chain>"
                },
            )
            .finish()
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "File manager over an S3-compatible bucket")]
pub struct Args {
    /// Host to bind to (overrides FILE_MANAGER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides FILE_MANAGER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Largest accepted upload body in bytes (overrides FILE_MANAGER_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Storage backend (overrides STORAGE_BACKEND)
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Bucket name (overrides STORAGE_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Base URL objects are publicly served from (overrides STORAGE_PUBLIC_URL)
    #[arg(long)]
    pub public_url: Option<String>,

    /// Custom S3 endpoint URL (overrides STORAGE_ENDPOINT)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Provider region (overrides STORAGE_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Address buckets by path instead of virtual host
    #[arg(long)]
    pub force_path_style: bool,

    /// Follow continuation tokens when listing instead of returning one page
    #[arg(long)]
    pub list_all_pages: bool,
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();
        Self::resolve(args, |name| env::var(name))
    }

    /// Merge parsed flags over values read through `lookup`.
    pub fn resolve<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let var = |name: &str| -> Result<Option<String>> {
            match lookup(name) {
                Ok(value) if value.trim().is_empty() => Ok(None),
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(err) => Err(err).with_context(|| format!("reading {}", name)),
            }
        };

        // --- Environment fallback ---
        let env_port = match var("FILE_MANAGER_PORT")? {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing FILE_MANAGER_PORT value `{}`", value))?,
            None => DEFAULT_PORT,
        };
        let env_max_upload = match var("FILE_MANAGER_MAX_UPLOAD_BYTES")? {
            Some(value) => value.parse::<usize>().with_context(|| {
                format!("parsing FILE_MANAGER_MAX_UPLOAD_BYTES value `{}`", value)
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        let env_backend = match var("STORAGE_BACKEND")? {
            Some(value) => Backend::from_str(&value, true)
                .map_err(|err| anyhow!(err))
                .context("parsing STORAGE_BACKEND")?,
            None => Backend::S3,
        };
        let env_path_style =
            parse_flag("STORAGE_FORCE_PATH_STYLE", var("STORAGE_FORCE_PATH_STYLE")?)?;
        let env_all_pages = parse_flag("STORAGE_LIST_ALL_PAGES", var("STORAGE_LIST_ALL_PAGES")?)?;

        // --- Merge ---
        let cfg = Self {
            host: args
                .host
                .or(var("FILE_MANAGER_HOST")?)
                .unwrap_or_else(|| "0.0.0.0".into()),
            port: args.port.unwrap_or(env_port),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
            backend: args.backend.unwrap_or(env_backend),
            bucket: args.bucket.or(var("STORAGE_BUCKET")?),
            public_url: args
                .public_url
                .or(var("STORAGE_PUBLIC_URL")?)
                .unwrap_or_default(),
            endpoint: args.endpoint.or(var("STORAGE_ENDPOINT")?),
            region: args.region.or(var("STORAGE_REGION")?),
            force_path_style: args.force_path_style || env_path_style,
            list_all_pages: args.list_all_pages || env_all_pages,
            access_key_id: var("STORAGE_ACCESS_KEY_ID")?,
            secret_access_key: var("STORAGE_SECRET_ACCESS_KEY")?,
        };

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.backend == Backend::S3 && self.bucket.is_none() {
            bail!("STORAGE_BUCKET (or --bucket) is required for the s3 backend");
        }
        if self.public_url.is_empty() {
            bail!("STORAGE_PUBLIC_URL (or --public-url) is required");
        }
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            bail!("STORAGE_ACCESS_KEY_ID and STORAGE_SECRET_ACCESS_KEY must be set together");
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(name: &str, value: Option<String>) -> Result<bool> {
    match value {
        None => Ok(false),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("parsing {} value `{}` as a boolean", name, value),
        },
    }
}
