//! Command-line front end for LaserKit.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use laserkit::{
    init_logging, list_ports, Config, ControllerModel, GrblDriver, LaserJob, ProgressListener,
    SerialTransport,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "laserkit",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about = "Driver for GRBL-family laser cutters"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List serial ports that look like controllers.
    Ports,

    /// Show the configurable attributes of a model.
    Attributes {
        /// Controller model (grbl, falcon2).
        #[arg(long, default_value = "grbl")]
        model: ControllerModel,
    },

    /// Open a controller and run the connection handshake.
    Connect(ConnectArgs),

    /// Connect and send a job file.
    Send {
        #[command(flatten)]
        connect: ConnectArgs,
        /// Job in JSON form.
        job: PathBuf,
    },

    /// Write the G-code of a job file without a controller.
    Save {
        #[command(flatten)]
        connect: ConnectArgs,
        /// Job in JSON form.
        job: PathBuf,
        /// Output file, stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ConnectArgs {
    /// Configuration file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Serial port, overrides the configuration.
    #[arg(long)]
    port: Option<String>,
    /// Controller model, overrides the configuration.
    #[arg(long)]
    model: Option<ControllerModel>,
}

/// Prints driver phases as they happen.
struct ConsoleProgress;

impl ProgressListener for ConsoleProgress {
    fn task_changed(&mut self, source: &str, task: &str) {
        println!("[{source}] {task}");
    }

    fn progress_changed(&mut self, source: &str, percent: u8) {
        println!("[{source}] {percent}%");
    }
}

fn load_config(args: &ConnectArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_or_default(&Config::default_path()?)?,
    };
    if let Some(port) = &args.port {
        config.connection.port = port.clone();
    }
    if let Some(model) = args.model {
        config.machine.model = model.id().to_string();
    }
    config.validate()?;
    Ok(config)
}

fn open_serial(driver: &GrblDriver) -> Result<SerialTransport> {
    let settings = driver.config();
    SerialTransport::open(&settings.com_port, settings.baud_rate)
        .with_context(|| format!("opening {}", settings.com_port))
}

fn load_job(path: &Path) -> Result<LaserJob> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn ports() -> Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No controller ports found");
    }
    for port in ports {
        match (port.vid, port.pid) {
            (Some(vid), Some(pid)) => {
                println!("{}\t{}\t{:04x}:{:04x}", port.port_name, port.description, vid, pid)
            }
            _ => println!("{}\t{}", port.port_name, port.description),
        }
    }
    Ok(())
}

fn attributes(model: ControllerModel) -> Result<()> {
    let driver = GrblDriver::new(model)?;
    println!("{}", driver.model_name());
    for setting in driver.settings() {
        println!(
            "  {:<50} {:<8} {}",
            setting.id,
            setting.setting_type.name(),
            setting.value
        );
    }
    Ok(())
}

fn connect(args: &ConnectArgs) -> Result<()> {
    let driver = load_config(args)?.build_driver()?;
    let transport = open_serial(&driver)?;
    let mut session = driver.open(transport);
    session.connect(&mut ConsoleProgress)?;
    println!("{} ready", driver.model_name());
    Ok(())
}

fn send(args: &ConnectArgs, job: &Path) -> Result<()> {
    let driver = load_config(args)?.build_driver()?;
    let job = load_job(job)?;
    let transport = open_serial(&driver)?;
    driver.send_job(transport, &job, &mut ConsoleProgress)?;
    Ok(())
}

fn save(args: &ConnectArgs, job: &Path, output: Option<&Path>) -> Result<()> {
    let driver = load_config(args)?.build_driver()?;
    let job = load_job(job)?;
    let gcode = driver.save_job(Vec::new(), &job)?;
    match output {
        Some(path) => {
            std::fs::write(path, gcode).with_context(|| format!("writing {}", path.display()))?
        }
        None => print!("{}", String::from_utf8_lossy(&gcode)),
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match &cli.command {
        Command::Ports => ports(),
        Command::Attributes { model } => attributes(*model),
        Command::Connect(args) => connect(args),
        Command::Send { connect, job } => send(connect, job),
        Command::Save {
            connect,
            job,
            output,
        } => save(connect, job, output.as_deref()),
    }
}
