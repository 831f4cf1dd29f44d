use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use luapack::config::{DEFAULT_OUTPUT, PackConfig};
use luapack::generator::installer::TemplateSource;
use luapack::pack::pack;
use luapack::packager::ChildOrder;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pack a directory tree into a single self-installing Lua script",
    long_about = None
)]
struct Cli {
    /// Directory to package
    #[arg(value_name = "ROOT", env = "LUAPACK_ROOT")]
    root: Utf8PathBuf,

    /// Installer file to write
    #[arg(short, long, value_name = "PATH", env = "LUAPACK_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: Utf8PathBuf,

    /// Installer template with {package_dump} and {raw_package_content} placeholders
    /// (defaults to the built-in installer)
    #[arg(short, long, value_name = "PATH", env = "LUAPACK_TEMPLATE")]
    template: Option<Utf8PathBuf>,

    /// Script the installer runs when done (defaults to ROOT_NAME/main.lua)
    #[arg(long, value_name = "PATH", env = "LUAPACK_ENTRY_POINT")]
    entry_point: Option<String>,

    /// Name shown in the installer's boot prompt (defaults to ROOT_NAME)
    #[arg(long, value_name = "NAME")]
    product_name: Option<String>,

    /// Visit directory entries sorted by name instead of in listing order
    #[arg(long)]
    sort: bool,

    /// Skip entries whose name matches this glob (repeatable)
    #[arg(short = 'x', long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Also print the manifest as JSON to stdout
    #[arg(long)]
    manifest_json: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log per-directory detail
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> Result<PackConfig> {
        let mut config = PackConfig::new(&self.root)?
            .exclude_patterns(self.exclude.iter().map(String::as_str))?;
        config.output = self.output.clone();
        if let Some(template) = &self.template {
            config.template = TemplateSource::File(template.clone());
        }
        if let Some(entry_point) = &self.entry_point {
            config.meta.entry_point = entry_point.clone();
        }
        if let Some(product_name) = &self.product_name {
            config.meta.product_name = product_name.clone();
        }
        if self.sort {
            config.order = ChildOrder::Name;
        }
        Ok(config)
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = cli.to_config().context("Invalid configuration")?;
    let report = pack(&config)
        .with_context(|| format!("Failed to package {}", config.root))?;

    if cli.manifest_json {
        println!("{}", report.package.manifest_json()?);
    }
    Ok(())
}
