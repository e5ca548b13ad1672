#[cfg(target_arch = "wasm32")]
fn main() {
    if let Err(e) = idle_knight::web::start() {
        web_sys::console::error_1(&e);
    }
}

/// Native build: play a few in-game lifetimes headlessly and log the result.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use idle_knight::game::config::EngineConfig;
    use idle_knight::game::format::{format, format_age, format_coins};
    use idle_knight::game::simulator;
    use idle_knight::game::snapshot::CharacterSnapshot;
    use idle_knight::game::state::GameState;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    /// Three natural lifetimes at base speed.
    const SIMULATED_TICKS: u64 = 3 * 56 * 365 * 5;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut state = GameState::with_config(EngineConfig::default())?;
    info!(ticks = SIMULATED_TICKS, "starting headless run");
    let report = simulator::run(&mut state, SIMULATED_TICKS);

    info!(
        deaths = report.deaths,
        bankruptcies = report.bankruptcies,
        job_levels = report.job_levels,
        skill_levels = report.skill_levels,
        "totals"
    );
    info!(
        best_job = report.best_job,
        best_income = %format(report.best_income),
        "career"
    );
    info!(
        age = %format_age(state.days),
        coins = %format_coins(state.coins),
        evil = %format(state.evil),
        "final state"
    );
    info!("{}", CharacterSnapshot::from_state(&state).encode());
    Ok(())
}
