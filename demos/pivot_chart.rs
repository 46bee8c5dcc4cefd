use pivotfit::{error::Error, Dataset, Pipeline, PolynomialSolver, Trendline};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    //
    // Log what the pipeline is doing; try RUST_LOG=pivotfit=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    //
    // A worksheet, as a spreadsheet parser would hand it over: one object per row,
    // with the odd number stored as text and the odd cell that is not a number at all
    let data = Dataset::from_json(include_str!("sample_sheet.json"))?;
    println!("Columns: {}", data.columns().join(", "));

    //
    // The chart setup saved from a previous session
    let pipeline = Pipeline::from_json(include_str!("style_config.json"))?;
    let output = pipeline.run(&data);

    for series in &output.series {
        println!();
        println!("{} ({:?} axis, {} points)", series.name, series.axis, series.len());

        let labels = series.data_labels.as_deref().unwrap_or_default();
        let errors = series.errors.as_deref().unwrap_or_default();
        for (i, (x, y)) in series.x.iter().zip(&series.y).enumerate() {
            let label = labels.get(i).map_or("", String::as_str);
            let error = errors.get(i).copied().unwrap_or(0.0);
            println!("  {:>6} | x = {x:>4} | y = {y:>8.3} ± {error:.3} | {label}", series.tick_labels[i]);
        }

        //
        // A failed trendline only drops the overlay
        match &series.trend {
            Some(Ok(fit)) => println!("  {} (R² = {:.4})", fit.equation(3), fit.r_squared()),
            Some(Err(e)) => println!("  no trendline: {e}"),
            None => {}
        }
    }

    //
    // The same fit through QR, for comparison
    let mut config = pipeline.config().clone();
    config.solver = PolynomialSolver::Qr;
    config.trendline = Trendline::Poly { degree: 3 };
    let qr = Pipeline::new(config)?.run(&data);
    if let Some(fit) = qr.series[0].trendline() {
        println!();
        println!("Cubic via QR: {}", fit.equation(3));
    }

    //
    // Save the setup back out, as the dashboard's config export does
    println!();
    println!("{}", pipeline.config().to_json()?);

    Ok(())
}
