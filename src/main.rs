use clap::{Arg, Command};
use skytrans::{
    Dispatcher, GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator,
    TranslatorConfig, Worker, WorkerEvent, WorkerOptions,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("skytrans")
        .version("0.1.0")
        .about("Selective machine translation for game data files")
        .arg(
            Arg::new("base-dir")
                .help("Game root directory (data files under <base>/data)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target-locale")
                .help("Target language code (e.g., es, fr, de)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source language code (default: en)")
                .default_value("en"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to a translator_config.json overriding the defaults"),
        )
        .arg(
            Arg::new("plugin-name")
                .long("plugin-name")
                .short('p')
                .help("Output plugin folder name (default: translation-<locale>)"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator instead of Google Translate")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show per-file log output")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let base_dir = PathBuf::from(matches.get_one::<String>("base-dir").unwrap());
    let target_locale = matches.get_one::<String>("target-locale").unwrap().clone();
    let source_locale = matches.get_one::<String>("source-locale").unwrap().clone();
    let use_mock = matches.get_flag("mock");
    let verbose = matches.get_flag("verbose");

    let config = match matches.get_one::<String>("config") {
        Some(path) => TranslatorConfig::load(path.as_ref())?,
        None => TranslatorConfig::default(),
    };

    let provider: Arc<dyn MachineTranslator> = if use_mock {
        Arc::new(MockTranslator::new(MockMode::Suffix))
    } else {
        if env::var("GOOGLE_TRANSLATE_API_KEY").is_err() {
            eprintln!("GOOGLE_TRANSLATE_API_KEY environment variable not set");
            eprintln!("Set it with: export GOOGLE_TRANSLATE_API_KEY=your_api_key");
            eprintln!("Or use --mock to use the mock translator");
            return Err("Missing API key".into());
        }
        Arc::new(GoogleTranslateProvider::from_env()?)
    };

    let plugin_name = matches
        .get_one::<String>("plugin-name")
        .cloned()
        .unwrap_or_else(|| format!("translation-{}", target_locale));

    let options = WorkerOptions {
        base_dir,
        source_locale,
        target_locale,
        plugin_name,
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let worker = Worker::new(Dispatcher::new(config), provider, tx, cancel);

    let consumer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                WorkerEvent::Log(line) => {
                    if verbose {
                        println!("{}", line);
                    }
                }
                WorkerEvent::Progress(percent) => {
                    if verbose {
                        println!("Progress: {}%", percent);
                    }
                }
                WorkerEvent::FileDone {
                    path,
                    lines_translated,
                } => {
                    println!("{}: {} lines translated", path.display(), lines_translated);
                }
                WorkerEvent::Finished(summary) => {
                    println!(
                        "Done: {} files scanned, {} written, {} lines translated{}",
                        summary.files_scanned,
                        summary.files_written,
                        summary.lines_translated,
                        if summary.cancelled { " (cancelled)" } else { "" }
                    );
                }
            }
        }
    });

    let result = worker.run(&options).await;
    drop(worker);
    let _ = consumer.await;

    result?;
    Ok(())
}
