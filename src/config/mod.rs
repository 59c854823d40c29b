pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::TomlConfig;
    use crate::core::ProviderKind;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "path-suggest")]
    #[command(about = "Suggest learning paths from your goals and trending skills")]
    pub struct CliConfig {
        /// Your learning goals, e.g. "become a data scientist"
        #[arg(short, long, conflicts_with = "input")]
        pub goals: Option<String>,

        /// Trending skills you care about (optional)
        #[arg(short, long, default_value = "", conflicts_with = "input")]
        pub skills: String,

        /// JSON request file with `userGoals` and `trendingSkills` ("-" for stdin)
        #[arg(short, long)]
        pub input: Option<String>,

        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, value_enum)]
        pub provider: Option<ProviderKind>,

        #[arg(long)]
        pub model: Option<String>,

        #[arg(long)]
        pub base_url: Option<String>,

        #[arg(long)]
        pub timeout_seconds: Option<u64>,

        #[arg(long)]
        pub min_goal_length: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        pub json: bool,

        /// Render the prompt without calling the provider
        #[arg(long)]
        pub dry_run: bool,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub log_json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// 命令列參數覆蓋檔案設定
        pub fn apply_overrides(&self, config: &mut TomlConfig) {
            if let Some(kind) = self.provider {
                if kind != config.provider.kind {
                    // 換 provider 時，舊的 URL/model 不再適用
                    if self.base_url.is_none() {
                        config.provider.base_url = None;
                    }
                    if self.model.is_none() {
                        config.provider.model = None;
                    }
                }
                config.provider.kind = kind;
            }
            if let Some(model) = &self.model {
                config.provider.model = Some(model.clone());
            }
            if let Some(base_url) = &self.base_url {
                config.provider.base_url = Some(base_url.clone());
            }
            if let Some(timeout) = self.timeout_seconds {
                config.provider.timeout_seconds = Some(timeout);
            }
            if let Some(min) = self.min_goal_length {
                config.request.min_goal_length = Some(min);
            }
            if self.log_json {
                config.logging.json = Some(true);
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core::ConfigProvider;

        #[test]
        fn test_parse_goals_and_defaults() {
            let cli = CliConfig::parse_from(["path-suggest", "--goals", "become a data scientist"]);
            assert_eq!(cli.goals.as_deref(), Some("become a data scientist"));
            assert_eq!(cli.skills, "");
            assert!(!cli.dry_run);
        }

        #[test]
        fn test_goals_conflict_with_input() {
            let result = CliConfig::try_parse_from([
                "path-suggest",
                "--goals",
                "learn Rust",
                "--input",
                "request.json",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn test_skills_conflict_with_input() {
            let err = CliConfig::try_parse_from([
                "path-suggest",
                "--input",
                "request.json",
                "--skills",
                "Python",
            ])
            .unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

            // 預設的空字串不算衝突
            let cli = CliConfig::try_parse_from(["path-suggest", "--input", "request.json"]).unwrap();
            assert_eq!(cli.input.as_deref(), Some("request.json"));
            assert_eq!(cli.skills, "");
        }

        #[test]
        fn test_overrides_win_over_file() {
            let mut config = TomlConfig::from_toml_str(
                "[provider]\nkind = \"gemini\"\nmodel = \"gemini-1.5-pro\"\ntimeout_seconds = 60\n",
            )
            .unwrap();

            let cli = CliConfig::parse_from([
                "path-suggest",
                "--goals",
                "learn Rust",
                "--timeout-seconds",
                "5",
                "--min-goal-length",
                "3",
            ]);
            cli.apply_overrides(&mut config);

            assert_eq!(config.model(), "gemini-1.5-pro");
            assert_eq!(config.request_timeout(), std::time::Duration::from_secs(5));
            assert_eq!(config.min_goal_length(), 3);
        }

        #[test]
        fn test_switching_provider_resets_provider_specific_fields() {
            let mut config = TomlConfig::from_toml_str(
                "[provider]\nkind = \"gemini\"\nmodel = \"gemini-1.5-pro\"\n",
            )
            .unwrap();

            let cli = CliConfig::parse_from(["path-suggest", "-g", "learn Rust", "--provider", "openai"]);
            cli.apply_overrides(&mut config);

            assert_eq!(config.provider_kind(), ProviderKind::OpenAi);
            assert_eq!(config.model(), "gpt-4o-mini");
            assert_eq!(config.base_url(), "https://api.openai.com");
        }
    }
}
