use clap::Parser;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use tracing::error;
use tracing::Level;

use pilothouse::configuration::DeviceConfig;
use pilothouse::nmea::Device;
use pilothouse::nmea::DeviceRegistry;
use pilothouse::nmea::ReplayDevice;
use pilothouse::nmea::Sentence;
use pilothouse::nmea::SerialDevice;

/// Watch the sentences coming from one NMEA device
#[derive(Parser)]
struct Args {
    /// serial device path
    #[clap(long, required_unless_present = "replay", conflicts_with = "replay")]
    device: Option<String>,

    /// device baud rate
    #[clap(long, default_value_t = 38400)]
    baud_rate: u32,

    /// replay sentences from a log file instead of a serial device
    #[clap(long)]
    replay: Option<PathBuf>,

    /// delay between replayed lines in milliseconds
    #[clap(long, default_value_t = 100)]
    replay_delay: u64,

    /// print sentences as JSON
    #[clap(long)]
    json: bool,

    /// sentence bodies to send to the device before watching
    #[clap(long)]
    send: Vec<String>,
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("no global subscriber has been set");

    let args = Args::parse();

    let registry = DeviceRegistry::new();
    let mut stream = registry.open_stream();

    let device: Arc<dyn Device> = match &args.replay {
        Some(path) => {
            let delay = Some(Duration::from_millis(args.replay_delay));

            match ReplayDevice::open("replay", path, delay).await {
                Ok(d) => Arc::new(d),
                Err(e) => {
                    error!("failed to open {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            let config = DeviceConfig {
                name: "watch".to_string(),
                device: args.device.clone().unwrap_or_default(),
                baud_rate: Some(args.baud_rate),
                framing: None,
                flow_control: None,
                timeout: None,
            };

            let serial = match SerialDevice::open(&config).await {
                Ok(d) => d,
                Err(e) => {
                    error!("failed to open device: {:?}", e);
                    std::process::exit(1);
                }
            };

            for body in &args.send {
                if let Err(e) = serial.send(body).await {
                    error!("failed to send {:?}: {}", body, e);
                    std::process::exit(1);
                }
            }

            Arc::new(serial)
        }
    };

    let mut reader = match registry.register(device) {
        Some(reader) => reader,
        None => unreachable!("no device with this id was registered before"),
    };

    loop {
        tokio::select! {
            sentence = stream.read() => {
                match sentence {
                    Some(s) => print(&s, args.json),
                    None => break,
                };
            }
            _ = &mut reader => {
                // the device is gone, drain what it left behind
                while let Ok(Some(sentence)) =
                    timeout(Duration::from_millis(200), stream.read()).await
                {
                    print(&sentence, args.json);
                }

                break;
            }
        }
    }
}

fn print(sentence: &Sentence, json: bool) {
    if json {
        match serde_json::to_string(sentence) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("{}", e),
        }
    } else {
        println!("{}", sentence.raw);
    }
}
