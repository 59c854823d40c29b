use clap::Parser;
use path_suggest::core::prompt;
use path_suggest::utils::error::SuggestError;
use path_suggest::utils::{logger, validation::Validate, validation::validate_min_length};
use path_suggest::{
    CliConfig, ConfigProvider, PathSuggestionRequest, PathSuggestionResponse, PathSuggestionService,
    ProviderClient, SuggestionReport, TomlConfig,
};
use std::io::Read;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (未指定時使用預設值)
    let mut config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(e.exit_code());
            }
        },
        None => TomlConfig::default(),
    };

    // 應用命令列覆蓋設定
    cli.apply_overrides(&mut config);

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("🚀 Starting path-suggest");
    if let Some(path) = &cli.config {
        tracing::info!("📁 Configuration loaded from: {}", path);
    }

    match run(&cli, &config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(
                "❌ Suggestion request failed: {} (Category: {:?}, Severity: {:?})",
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

async fn run(cli: &CliConfig, config: &TomlConfig) -> path_suggest::Result<()> {
    // 驗證配置
    config.validate()?;
    tracing::debug!(
        "Provider: {} ({}), model: {}, timeout: {:?}",
        config.provider_kind(),
        config.base_url(),
        config.model(),
        config.request_timeout()
    );

    let request = read_request(cli)?;

    // 表單層規則：目標至少 N 個字元
    validate_min_length("userGoals", &request.user_goals, config.min_goal_length()).map_err(
        |_| {
            SuggestError::validation(
                "userGoals",
                format!(
                    "Please describe your learning goals in at least {} characters.",
                    config.min_goal_length()
                ),
            )
        },
    )?;

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no provider call will be made");
        display_dry_run(config, &request);
        return Ok(());
    }

    let provider = ProviderClient::from_config(config)?;
    let service = PathSuggestionService::with_timeout(provider, config.request_timeout());

    let response = service.suggest(&request).await?;
    tracing::info!("✅ Learning paths generated");

    if cli.json {
        let report = SuggestionReport::new(config.provider_kind().as_str(), config.model(), response);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_suggestions(&response);
    }

    Ok(())
}

fn read_request(cli: &CliConfig) -> path_suggest::Result<PathSuggestionRequest> {
    match (&cli.input, &cli.goals) {
        (Some(path), _) => {
            let content = if path == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(path)?
            };
            let value: serde_json::Value = serde_json::from_str(&content)?;
            PathSuggestionRequest::from_value(&value)
        }
        (None, Some(goals)) => {
            let request = PathSuggestionRequest::new(goals.clone(), cli.skills.clone());
            request.validate()?;
            Ok(request)
        }
        (None, None) => Err(SuggestError::validation(
            "userGoals",
            "provide --goals or --input",
        )),
    }
}

fn display_suggestions(response: &PathSuggestionResponse) {
    if response.is_empty() {
        println!("🤷 No Suggestions Yet");
        println!(
            "The AI couldn't generate specific paths with the provided input. Try rephrasing your goals or adding more details."
        );
        return;
    }

    println!("📚 Suggested Learning Paths:");
    for (index, path) in response.suggested_learning_paths.iter().enumerate() {
        println!("  {}. {}", index + 1, path);
    }
}

fn display_dry_run(config: &TomlConfig, request: &PathSuggestionRequest) {
    println!("📋 Configuration Summary:");
    println!("  Provider: {}", config.provider_kind());
    println!("  Endpoint: {}", config.base_url());
    println!("  Model: {}", config.model());
    println!("  Timeout: {:?}", config.request_timeout());
    println!("  API key: {}", config.api_key_source());
    if let Some(temperature) = config.temperature() {
        println!("  Temperature: {}", temperature);
    }
    println!();
    println!("📝 Rendered Prompt:");
    println!("{}", prompt::render(request));
}
