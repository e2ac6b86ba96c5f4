use clap::Parser;
use petribench::config::{Command, CliConfig};
use petribench::core::builder::{BuildPlan, DetectedSource};
use petribench::core::entrypoint::Dispatch;
use petribench::core::Workload;
use petribench::domain::model::RunSummary;
use petribench::utils::logger;
use petribench::utils::validation::Validate;
use petribench::{
    BenchEngine, Builder, Entrypoint, FizzBuzzWorkload, LanguageProfile, MemoryWorkload,
    Result, SystemRunner, TomlConfig, WorkloadKind,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();
    let file = TomlConfig::load(config.config.as_deref());

    // 初始化日誌
    let json_logs = config.json_logs || file.as_ref().map(|f| f.json_logs()).unwrap_or(false);
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let result = match file {
        Ok(file) => execute(config.command, file).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ petribench failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}

async fn execute(command: Command, file: TomlConfig) -> Result<i32> {
    // 驗證配置
    file.validate()?;

    match command {
        Command::Run(args) => {
            let settings = args.resolve(&file)?;
            if settings.monitor {
                tracing::info!("🔍 System monitoring enabled");
            }

            let summary = match settings.kind {
                WorkloadKind::Memory => {
                    run_workload(MemoryWorkload::new(settings.params), settings.monitor)?
                }
                WorkloadKind::FizzBuzz => run_workload(
                    FizzBuzzWorkload::new(settings.params.fizzbuzz_limit),
                    settings.monitor,
                )?,
            };

            if settings.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Ok(0)
        }
        Command::Plan(args) => {
            let settings = args.resolve(&file)?;
            let builder = Builder::new(LanguageProfile::for_language(settings.language), SystemRunner);
            let plan = builder.plan(&settings.workspace, &settings.out_dir)?;
            display_plan(&plan);
            Ok(0)
        }
        Command::Build(args) => {
            let settings = args.resolve(&file)?;
            tracing::info!(
                "🔨 Building {} workspace {}",
                settings.language.display_name(),
                settings.workspace.display()
            );
            let builder = Builder::new(LanguageProfile::for_language(settings.language), SystemRunner);
            let outcome = builder.build(&settings.workspace, &settings.out_dir).await?;
            for artifact in &outcome.artifacts {
                println!("📦 {}", artifact.display());
            }
            Ok(0)
        }
        Command::Entrypoint(args) => {
            let settings = args.resolve(&file)?;
            let entrypoint = Entrypoint::new(LanguageProfile::for_language(settings.language), SystemRunner)
                .with_measure_command(settings.measure_command);
            entrypoint
                .run(&settings.workspace, &settings.bin_dir, &mut std::io::stdout())
                .await
        }
        Command::Usage(args) => {
            let language = args.resolve(&file)?;
            let entrypoint = Entrypoint::new(LanguageProfile::for_language(language), SystemRunner);
            entrypoint.execute(&Dispatch::Usage, &mut std::io::stdout()).await
        }
    }
}

fn run_workload<W: Workload>(workload: W, monitor: bool) -> Result<RunSummary> {
    let engine = BenchEngine::new_with_monitoring(workload, monitor);
    engine.run()
}

fn display_plan(plan: &BuildPlan) {
    println!("📋 Build Plan ({}):", plan.language.display_name());
    println!("  Workspace: {}", plan.workspace.display());
    println!("  Output: {}", plan.out_dir.display());

    match &plan.source {
        DetectedSource::Rule(marker) => println!("  Source: {}", marker),
        DetectedSource::Placeholder(file) => {
            println!("  Source: none found, placeholder {} will be generated", file)
        }
    }

    println!();
    println!("⚙️ Commands:");
    for command in &plan.commands {
        println!("  $ {}", command.display());
    }
    if let Some(command) = plan.commands.first() {
        if !command.env.is_empty() {
            let env: Vec<String> = command
                .env
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            println!("  Environment: {}", env.join(" "));
        }
    }

    println!();
    println!("💾 Artifacts: {}", plan.artifacts.join(", "));
    println!();
    println!("✅ Dry run complete. Use `petribench build` to compile.");
}
