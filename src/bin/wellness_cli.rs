// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use wellness_tracker::config::{Config, TrackingConfig};
use wellness_tracker::intelligence::risk_engine::risk_detail;
use wellness_tracker::intelligence::ActivityShortcut;
use wellness_tracker::logging;
use wellness_tracker::models::{
    ActivityLevel, BioSystem, Gender, GoalCategory, NewGoal, TimeRange, UserProfile,
};
use wellness_tracker::storage::create_persistor;
use wellness_tracker::store::{
    DashboardAction, OnboardingAction, ProgressAction, RiskAction, Store,
};

#[derive(Parser)]
#[command(name = "wellness-cli")]
#[command(about = "Track wellness goals, progress and health risks")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// TOML file overriding the tracking settings
    #[arg(long, global = true)]
    tracking_config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete onboarding with a user profile
    Onboard {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        gender: Gender,
        #[arg(long)]
        activity_level: ActivityLevel,
        #[arg(long)]
        height: Option<String>,
        #[arg(long)]
        weight: Option<String>,
    },

    /// List current goals
    Goals,

    /// Add an amount to a goal (capped at the increment ceiling)
    Log { goal_id: String, amount: f64 },

    /// Set a goal's current value
    Set { goal_id: String, value: String },

    /// Add the goal's default quick increment
    Quick { goal_id: String },

    /// Log a workout or a walk
    Activity { kind: ActivityShortcut },

    /// Add a custom goal
    AddGoal {
        #[arg(long)]
        title: String,
        #[arg(long)]
        target: f64,
        #[arg(long)]
        unit: String,
        #[arg(long)]
        category: GoalCategory,
        #[arg(long, default_value = "⭐")]
        icon: String,
        #[arg(long, default_value = "#3498DB")]
        color: String,
    },

    /// Remove a goal
    RemoveGoal { goal_id: String },

    /// Show progress statistics
    Progress {
        #[arg(long)]
        range: Option<TimeRange>,
        #[arg(long, conflicts_with = "all_categories")]
        category: Option<GoalCategory>,
        /// Clear the category filter
        #[arg(long)]
        all_categories: bool,
    },

    /// Show the health risk assessment
    Risks {
        /// Only show risks of one bio-system
        #[arg(long, conflicts_with = "all_systems")]
        system: Option<BioSystem>,
        /// Clear the bio-system filter
        #[arg(long)]
        all_systems: bool,
        /// Print the detail text of one risk
        #[arg(long)]
        detail: Option<String>,
    },

    /// Zero today's progress, or wipe all state with --all
    Reset {
        #[arg(long)]
        all: bool,
    },

    /// Show onboarding and configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.clone()).context("Failed to load configuration")?;
    if let Some(path) = &cli.tracking_config {
        config.tracking = TrackingConfig::load_from_file(path)?;
    }
    info!("{}", config.summary());

    let persistor = create_persistor(&config.storage)
        .await
        .context("Failed to open state storage")?;

    if let Commands::Reset { all: true } = cli.command {
        persistor.clear().await?;
        print_json(&json!({ "reset": "all" }))?;
        return Ok(());
    }

    let state = persistor
        .rehydrate()
        .await
        .context("Failed to restore persisted state")?;
    let mut store = Store::from_state(state, config.tracking.clone());
    let now = Utc::now();

    match cli.command {
        Commands::Onboard {
            name,
            age,
            phone,
            gender,
            activity_level,
            height,
            weight,
        } => {
            let profile = UserProfile {
                name,
                age,
                phone,
                gender: Some(gender),
                activity_level: Some(activity_level),
                height,
                weight,
                fitness_goals: Vec::new(),
            };
            store.dispatch_at(OnboardingAction::SetCurrentStep(1), now);
            store
                .submit_profile(profile)
                .map_err(|report| anyhow::anyhow!("{}", report))?;
            store.dispatch_at(OnboardingAction::CompleteOnboarding, now);
            store.sync(now);
            print_json(&store.state().onboarding)?;
        }
        Commands::Goals => {
            store.ensure_goals(now);
            print_json(&store.state().dashboard.wellness_goals)?;
        }
        Commands::Log { goal_id, amount } => {
            if store.state().dashboard.goal(&goal_id).is_none() {
                anyhow::bail!("No goal with id '{}'", goal_id);
            }
            store.dispatch_at(
                DashboardAction::IncrementGoalProgress {
                    goal_id: goal_id.clone(),
                    increment: amount,
                },
                now,
            );
            store.sync(now);
            print_json(&store.state().dashboard.goal(&goal_id))?;
        }
        Commands::Set { goal_id, value } => {
            store.set_custom_progress(&goal_id, &value, now)?;
            store.sync(now);
            print_json(&store.state().dashboard.goal(&goal_id))?;
        }
        Commands::Quick { goal_id } => {
            store.quick_add(&goal_id, now)?;
            store.sync(now);
            print_json(&store.state().dashboard.goal(&goal_id))?;
        }
        Commands::Activity { kind } => {
            let current = store.log_activity(kind, now)?;
            store.sync(now);
            print_json(&json!({ "activity": kind, "goal": kind.goal_title(), "current": current }))?;
        }
        Commands::AddGoal {
            title,
            target,
            unit,
            category,
            icon,
            color,
        } => {
            if !(target.is_finite() && target > 0.0) {
                anyhow::bail!("Goal target must be a positive number");
            }
            store.dispatch_at(
                DashboardAction::AddCustomGoal(NewGoal {
                    title,
                    icon,
                    current: 0.0,
                    target,
                    unit,
                    color,
                    category,
                }),
                now,
            );
            store.sync(now);
            print_json(&store.state().dashboard.wellness_goals.last())?;
        }
        Commands::RemoveGoal { goal_id } => {
            if store.state().dashboard.goal(&goal_id).is_none() {
                anyhow::bail!("No goal with id '{}'", goal_id);
            }
            store.dispatch_at(DashboardAction::RemoveGoal(goal_id.clone()), now);
            store.sync(now);
            print_json(&json!({ "removed": goal_id }))?;
        }
        Commands::Progress {
            range,
            category,
            all_categories,
        } => {
            if let Some(range) = range {
                store.dispatch_at(ProgressAction::SetTimeRange(range), now);
            }
            if category.is_some() || all_categories {
                store.dispatch_at(ProgressAction::SetCategoryFilter(category), now);
            }
            store.sync(now);

            let progress = &store.state().progress;
            print_json(&json!({
                "selected_time_range": progress.selected_time_range,
                "selected_category": progress.selected_category,
                "current_streak": progress.current_streak,
                "longest_streak": progress.longest_streak,
                "stats": store.progress_stats(now.date_naive()),
                "goals": store.filtered_goals(),
            }))?;
        }
        Commands::Risks {
            system,
            all_systems,
            detail,
        } => {
            store.sync(now);
            if system.is_some() || all_systems {
                store.dispatch_at(RiskAction::SetBioSystemFilter(system), now);
            }

            let risk = &store.state().risk;
            if let Some(risk_id) = detail {
                let entry = risk
                    .current_risks
                    .iter()
                    .find(|r| r.id == risk_id)
                    .with_context(|| format!("No risk with id '{}'", risk_id))?;
                println!("{}", risk_detail(entry));
            } else {
                let learn_more = risk.selected_bio_system.map(|s| json!({ "title": s.title(), "description": s.description() }));
                print_json(&json!({
                    "assessment": risk.risk_assessment,
                    "risks": risk.filtered_risks(),
                    "learn_more": learn_more,
                }))?;
            }
        }
        Commands::Reset { .. } => {
            store.dispatch_at(DashboardAction::ResetDailyProgress, now);
            store.sync(now);
            print_json(&json!({ "reset": "daily" }))?;
        }
        Commands::Status => {
            let onboarding = &store.state().onboarding;
            print_json(&json!({
                "onboarding_completed": onboarding.is_completed,
                "onboarding_step": onboarding.step(),
                "screens": store.root_screens(),
                "goals": store.state().dashboard.wellness_goals.len(),
                "storage": persistor.backend_name(),
                "persisted_slices": persistor.whitelist(),
            }))?;
        }
    }

    persistor
        .persist(store.state())
        .await
        .context("Failed to persist state")?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
