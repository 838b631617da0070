//! When steps for task delay BDD scenarios.

use super::world::{TaskDelayWorld, run_async};
use chrono::Duration;
use followup::task::api::DelayTaskBody;
use rstest_bdd_macros::when;

#[when(r#"the task is delayed to {days:i64} days from now because "{reason}""#)]
fn delay_task(world: &mut TaskDelayWorld, days: i64, reason: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let body = DelayTaskBody {
        reason,
        new_date: world.clock.in_days(days),
    };
    let result = run_async(world.api.delay_task(Some(&world.caller), task_id, body));
    world.record(result);
    Ok(())
}

#[when("{days:i64} days pass")]
fn days_pass(world: &mut TaskDelayWorld, days: i64) {
    world.clock.advance(Duration::days(days));
}

#[when("the task is completed")]
fn complete_task(world: &mut TaskDelayWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(world.api.complete_task(Some(&world.caller), task_id));
    world.record(result);
    Ok(())
}

#[when("another caller fetches the task")]
fn stranger_fetches_task(world: &mut TaskDelayWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(world.api.get_task(Some(&world.stranger), task_id));
    world.record(result);
    Ok(())
}
