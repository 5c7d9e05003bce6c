//! Basic example demonstrating two-model uplift scoring
//!
//! Run with: cargo run --example basic -p uplift

use std::sync::Arc;

use uplift::models::{Node, Tree};
use uplift::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== uplift Basic Example ===\n");

    let schema = FeatureSchema::new(["visits", "recency", "spend"])?;

    // Treated arm: logistic regression
    let treated = LogisticModel::new(-1.5, vec![0.4, -0.2, 0.01]);

    // Control arm: a single decision stump on "visits"
    let control = TreeEnsembleModel::new(
        -1.0,
        3,
        vec![Tree::new(vec![
            Node::Split {
                feature: 0,
                threshold: 3.0,
                left: 1,
                right: 2,
                default_left: true,
            },
            Node::Leaf { value: -0.5 },
            Node::Leaf { value: 0.3 },
        ])],
    );

    let bundle = ModelBundle::new("example", schema, Arc::new(treated), Arc::new(control))?;
    let service = UpliftService::new(bundle, &ServiceConfig::default());

    let payload = br#"{"instances": [
        {"visits": 1, "recency": 30, "spend": 12.5},
        {"visits": 6, "recency": 2, "spend": 80.0, "channel": "email"},
        {"spend": 5.0, "recency": 10, "visits": 3}
    ]}"#;

    let response = service.predict(payload)?;
    println!("Model: {} (n = {})", response.model, response.n);
    for (i, p) in response.predictions.iter().enumerate() {
        println!(
            "   #{}: p_treated={:.4} p_control={:.4} uplift={:+.4}",
            i, p.p_treated, p.p_control, p.uplift
        );
    }

    // Validation errors carry the offending index and key
    let err = service
        .predict(br#"{"instances": [{"visits": 1, "recency": "soon", "spend": 0}]}"#)
        .unwrap_err();
    println!("\nRejected: [{}] {}", err.kind(), err);

    println!("\n=== Example Complete ===");
    Ok(())
}
