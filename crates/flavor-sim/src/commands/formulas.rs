use std::error::Error;

use clap::Args;
use flavor_rules::{predict, GenerationHierarchy, Prediction};

use super::rule;

#[derive(Args, Debug)]
pub struct FormulasArgs {
    /// Print a single parameter, e.g. `PMNS_theta12`.
    #[arg(long)]
    pub parameter: Option<String>,
}

fn print_prediction(prediction: &Prediction) {
    println!("{} ({})", prediction.id.label(), prediction.id);
    println!("  {}", prediction.formula);
    match prediction.phase_degrees() {
        Some(degrees) => println!("  = {:.6}  (δ = {:.2}°)", prediction.value(), degrees),
        None => println!("  = {:.6}", prediction.value()),
    }
}

pub fn run(args: &FormulasArgs) -> Result<(), Box<dyn Error>> {
    if let Some(name) = &args.parameter {
        print_prediction(&predict(name)?);
        return Ok(());
    }

    let hierarchy = GenerationHierarchy::standard();
    let [p1, p2, p3] = hierarchy.p;
    println!("{}", rule(72, '='));
    println!(
        "Generation powers p = ({p1}, {p2}, {p3}); clusters {} and {}",
        hierarchy.cluster, hierarchy.cluster_secondary
    );
    println!("{}", rule(72, '='));
    for prediction in hierarchy.evaluate_all()? {
        print_prediction(&prediction);
    }

    println!("{}", rule(72, '-'));
    if let Some(relation) = hierarchy.cross_relation_theta13() {
        println!(
            "{} / {} = {} (expected {}, {})",
            relation.numerator,
            relation.denominator,
            relation.ratio,
            relation.expected,
            if relation.holds() { "holds" } else { "broken" }
        );
    }
    let phases = hierarchy.phase_structure()?;
    println!(
        "CP phases share numerator {}: sin δ_CKM = {} ({:.2}°), sin δ_PMNS = {} ({:.2}°)",
        phases.common_numerator, phases.ckm_sine, phases.ckm_degrees, phases.pmns_sine, phases.pmns_degrees
    );
    Ok(())
}
