//! Username validation demo: a not-null gate in front of independent checks
//!
//! Run with `RUST_LOG=gatekeep=trace` to see every unit evaluation.

use gatekeep::{
    init_logging, CustomUnit, Denylist, Length, LoggingConfig, NestedUnit, Orchestrator,
    OrchestratorConfig, Pattern, Registry, UnitExt,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::development())?;

    println!("gatekeep demo");
    println!("=============\n");

    let denylist = Denylist::new(["darn", "heck"]).message("username contains an offensive word");
    let denylist_handle = denylist.handle();

    // Checks that only make sense once a username is present
    let username_checks = Registry::new()
        .with(
            "username",
            Length::new()
                .range(3, 16)
                .message("username must be between 3 and 16 characters")
                .with_priority(1),
        )?
        .with(
            "username",
            Pattern::new(r"[A-Za-z0-9_]+")?
                .message("username may only contain letters, digits and underscores")
                .with_priority(2),
        )?
        .with("username", denylist.with_priority(3))?;

    let registry = Registry::new()
        .with(
            "username",
            NestedUnit::not_null("username", "username is required", username_checks),
        )?
        .with("email", gatekeep::NotNull::with_message("email is required"))?
        .with(
            "email",
            CustomUnit::check("email_format", "email must contain '@'", |value| {
                value.as_str().is_some_and(|s| s.contains('@'))
            })
            .with_priority(1),
        )?;

    let config = OrchestratorConfig::from_env()?;
    let orchestrator = Orchestrator::with_config(Arc::new(registry), config);

    println!("Execution order:");
    println!("{}\n", serde_json::to_string_pretty(&orchestrator.registry().describe())?);

    demo_single_inputs(&orchestrator)?;
    demo_request(&orchestrator)?;

    println!("Refreshing denylist...");
    denylist_handle.replace(["darn", "heck", "bother"]);
    let report = orchestrator.run("username", &json!("bother_bot"))?;
    println!("  'bother_bot' -> {:?}\n", report.messages());

    println!("All demos completed.");
    Ok(())
}

fn demo_single_inputs(orchestrator: &Orchestrator) -> Result<(), Box<dyn std::error::Error>> {
    println!("Single inputs:");

    let inputs: [Value; 5] = [
        Value::Null,
        json!("al"),
        json!("what the heck"),
        json!("a_very_long_username_indeed"),
        json!("alice_01"),
    ];

    for input in &inputs {
        let report = orchestrator.run("username", input)?;
        if report.is_valid() {
            println!("  {} -> valid", input);
        } else {
            println!("  {} -> {:?}", input, report.messages());
        }
    }

    println!();
    Ok(())
}

fn demo_request(orchestrator: &Orchestrator) -> Result<(), Box<dyn std::error::Error>> {
    println!("Whole request:");

    let data = json!({ "username": "heck", "email": "not-an-email" });
    let Some(fields) = data.as_object() else {
        return Ok(());
    };

    let request = orchestrator.run_request(fields)?;
    println!("{}\n", serde_json::to_string_pretty(&request.to_json())?);
    Ok(())
}
