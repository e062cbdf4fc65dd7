use anyhow::Context;
use clap::Parser;
use vehicle_store::utils::error::ErrorCategory;
use vehicle_store::utils::{logger, validation::Validate};
use vehicle_store::{
    CliConfig, ConfigProvider, Engine, LocalStorage, TomlConfig, Transmission, Vehicle,
    VehicleStorage, Wheel,
};

fn example_vehicle() -> vehicle_store::Result<Vehicle> {
    let engine = Engine::new("Electric", 200.0)?;
    let transmission = Transmission::new("Automatic", 1)?;
    let wheels = (0..4).map(|_| Wheel::new(19)).collect::<vehicle_store::Result<Vec<_>>>()?;

    Ok(Vehicle::electric_car(
        "Tesla Model 3",
        engine,
        transmission,
        wheels,
        5,
        75.0,
    ))
}

fn run<C: ConfigProvider + Validate>(config: &C) -> vehicle_store::Result<usize> {
    config.validate()?;

    let storage = LocalStorage::new(config.data_dir());
    let mut store = VehicleStorage::with_policy(storage, config.decode_policy());

    store.load_json(config.json_file())?;
    store.add(example_vehicle()?);

    store.save_json(config.json_file())?;
    store.save_xml(config.xml_file())?;

    Ok(store.len())
}

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = match &cli.config {
        Some(path) => Some(
            TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?,
        ),
        None => None,
    };

    let level = logger::resolve_level(
        file_config.as_ref().map(|config| config.log_level()),
        cli.verbose,
    );
    if cli.json_logs {
        logger::init_json_logger(level);
    } else {
        logger::init_cli_logger(level);
    }

    tracing::info!("Starting vehicle-store");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match &file_config {
        Some(config) => run(config),
        None => run(&cli),
    };

    match result {
        Ok(count) => {
            tracing::info!("✅ Collection of {} vehicles saved as JSON and XML", count);
            println!("✅ All vehicles saved to JSON and XML.");
        }
        Err(e) => {
            tracing::error!("❌ vehicle-store failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.category() {
                ErrorCategory::Configuration => 1,
                ErrorCategory::Data => 2,
                ErrorCategory::Storage => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
