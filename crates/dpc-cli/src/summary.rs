use console::Style;
use dpc_core::config::RunConfig;
use dpc_core::orchestrator::RunOutcome;
use ndarray::Array2;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

pub fn print_run_header(config: &RunConfig) {
    let s = Styles::new();
    println!();
    println!("  {}", s.title.apply_to("DPC Reconstruction"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();
    println!(
        "  {:<10}{}",
        s.label.apply_to("Grid"),
        s.value.apply_to(format!("{} x {}", config.rows, config.cols))
    );
    println!(
        "  {:<10}{}",
        s.label.apply_to("Mosaic"),
        s.value.apply_to(format!("{} x {}", config.mosaic_x, config.mosaic_y))
    );
    println!("  {:<10}{}", s.label.apply_to("Workers"), s.value.apply_to(config.workers));
    println!();
}

fn mean(g: &Array2<f64>) -> f64 {
    g.sum() / g.len() as f64
}

pub fn print_run_summary(outcome: &RunOutcome) {
    let s = Styles::new();
    if outcome.cancelled {
        println!("\n  {}", s.disabled.apply_to("Run cancelled."));
        return;
    }

    println!();
    println!("  {}", s.title.apply_to("Results"));
    println!("    {:<8}{:.4}", s.label.apply_to("a"), mean(&outcome.a));
    println!("    {:<8}{:.6}", s.label.apply_to("gx"), mean(&outcome.gx));
    println!("    {:<8}{:.6}", s.label.apply_to("gy"), mean(&outcome.gy));
    println!("    {:<8}{:.6}", s.label.apply_to("rx"), mean(&outcome.rx));
    println!("    {:<8}{:.6}", s.label.apply_to("ry"), mean(&outcome.ry));
    match &outcome.phi {
        Some(phi) => println!("    {:<8}{:.6} ({})", s.label.apply_to("phi"), mean(phi), s.value.apply_to("integrated")),
        None => println!("    {:<8}{}", s.label.apply_to("phi"), s.disabled.apply_to("not computed (1-D grid)")),
    }
    println!();
}
