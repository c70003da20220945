use std::path::PathBuf;

use dotenv::dotenv;
use tmu_schedule_export::{
    ExportContext, ExportUi, FileSaver, HarFile, Notice, Notifier, Observer, TriggerControl,
};

extern crate env_logger;
extern crate log;

use log::LevelFilter;

use log::{debug, info};

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        println!("{notice}");
    }
}

struct DirectorySaver {
    output_dir: PathBuf,
}

impl FileSaver for DirectorySaver {
    fn save(&self, file_name: &str, mime: &str, contents: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, contents)?;
        info!("Saved {} ({}) to {}", file_name, mime, path.display());
        Ok(())
    }
}

struct ConsoleControl;

impl TriggerControl for ConsoleControl {
    fn set_busy(&self, busy: bool) {
        if busy {
            info!("Exporting timetable...");
        } else {
            debug!("Export control released");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .init();

    let context = ExportContext::new()?;
    let config = &context.export_config;

    let observer = Observer::new();
    HarFile::load(&config.har_path)?.replay(&observer);

    let saver = DirectorySaver {
        output_dir: config.output_dir.clone(),
    };

    context
        .export_captured(
            &observer,
            ExportUi {
                notifier: &ConsoleNotifier,
                saver: &saver,
                control: &ConsoleControl,
            },
        )
        .await;
    Ok(())
}
