use std::{path::PathBuf, process::ExitCode, sync::Arc};

use hydra::{
    application::{error::AppError, hierarchy::HierarchyResolver, store::BackingStore},
    cache::{AttributeCache, CacheConfig, Clock, MemoryCache, SharedCache, StatCache, SystemClock},
    config,
    domain::path::ResourcePath,
    infra::{fs_store::FsStore, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_application_error(&error);
            ExitCode::from(error.exit_code())
        }
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(source = report.source, causes = ?report.messages, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(source = report.source, causes = ?report.messages, "application error");
    });
}

struct Services {
    attributes: AttributeCache,
    stats: StatCache,
    hierarchy: HierarchyResolver,
}

fn build_services(settings: &config::Settings) -> Services {
    let cache_config = CacheConfig::from(&settings.cache);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let shared: Arc<dyn SharedCache> = Arc::new(MemoryCache::new(
        cache_config.capacity_non_zero(),
        clock.clone(),
    ));
    let store: Arc<dyn BackingStore> = Arc::new(FsStore::new());
    let root = settings.content.root.clone();

    let attributes = AttributeCache::new(
        store.clone(),
        shared.clone(),
        clock.clone(),
        root.clone(),
        cache_config.clone(),
    );
    let stats = StatCache::new(store, shared, clock, root, &cache_config);
    let hierarchy = HierarchyResolver::new(attributes.clone());

    Services {
        attributes,
        stats,
        hierarchy,
    }
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let services = build_services(&settings);

    match cli_args.command {
        config::Command::Attrs(args) => {
            let path = ResourcePath::new(args.segments);
            let set = services
                .attributes
                .get_properties(&path, &args.names.to_request())
                .await?;
            print_json(&set)
        }
        config::Command::Stat(args) => {
            let path = ResourcePath::new(args.segments);
            let file = services.stats.is_file(&path).await?;
            let directory = services.stats.is_directory(&path).await?;
            print_json(&StatOutput {
                path: path.display_path(),
                file,
                directory,
            })
        }
        config::Command::Course(args) => {
            let node = services
                .hierarchy
                .get_course(&args.course, &args.names.to_request())
                .await?;
            print_json(&node)
        }
        config::Command::Lesson(args) => {
            let node = services
                .hierarchy
                .get_lesson(&args.course, &args.lesson, &args.names.to_request())
                .await?;
            print_json(&node)
        }
        config::Command::Problem(args) => {
            let node = services
                .hierarchy
                .get_problem(
                    &args.course,
                    &args.lesson,
                    &args.problem,
                    &args.names.to_request(),
                )
                .await?;
            print_json(&node)
        }
        config::Command::Outline(args) => {
            let outline = services.hierarchy.get_all_problems(&args.course).await?;
            print_json(&outline)
        }
    }
}

#[derive(Serialize)]
struct StatOutput {
    path: String,
    file: Option<PathBuf>,
    directory: Option<PathBuf>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
