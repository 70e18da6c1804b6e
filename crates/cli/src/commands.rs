// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand implementations: fetch, format, print.

use anyhow::Context;

use crate::client::SchedulerClient;
use crate::color;
use crate::output;

pub async fn status(client: &SchedulerClient) -> anyhow::Result<()> {
    let enabled = color::should_colorize();
    let health = client.health().await.context("scheduler unreachable")?;
    println!("{}", color::paint(color::codes::OK, "✓ Scheduler is healthy", enabled));
    println!("Nodes: {}", health.nodes);
    println!("Workloads: {}", health.workloads);
    Ok(())
}

pub async fn nodes(client: &SchedulerClient) -> anyhow::Result<()> {
    let enabled = color::should_colorize();
    let nodes = client.nodes().await?;
    if nodes.is_empty() {
        println!("No nodes registered");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = nodes
        .iter()
        .map(|n| {
            vec![
                n.host.clone(),
                n.port.to_string(),
                color::node_status(n.status, enabled),
                format!("{:.1}", n.cpu_usage),
                format!("{:.1}", n.memory_usage),
                n.running_processes.to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        output::table(&["HOST", "PORT", "STATUS", "CPU %", "MEM %", "PROCS"], &rows)
    );
    Ok(())
}

pub async fn register(client: &SchedulerClient, host: &str, port: u16) -> anyhow::Result<()> {
    let response = client.register_node(host, port).await?;
    println!("{}", response.message);
    Ok(())
}

pub async fn workloads(client: &SchedulerClient) -> anyhow::Result<()> {
    let enabled = color::should_colorize();
    let workloads = client.workloads().await?;
    if workloads.is_empty() {
        println!("No workloads");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = workloads
        .iter()
        .map(|w| {
            vec![
                w.id.to_string(),
                w.script_path.clone(),
                format!("{}:{}", w.node_host, w.node_port),
                color::workload_status(w.status, enabled),
                output::format_pid(w.pid),
                output::format_time(w.start_time),
            ]
        })
        .collect();
    print!(
        "{}",
        output::table(&["ID", "SCRIPT", "NODE", "STATUS", "PID", "STARTED"], &rows)
    );
    Ok(())
}

pub async fn submit(client: &SchedulerClient, script_path: &str) -> anyhow::Result<()> {
    let enabled = color::should_colorize();
    let response = client.submit(script_path).await?;
    println!(
        "{}",
        color::paint(color::codes::OK, "✓ Workload submitted", enabled)
    );
    println!("Workload ID: {}", response.workload_id);
    println!("Node: {}", response.node);
    Ok(())
}

pub async fn stop(client: &SchedulerClient, workload_id: &str) -> anyhow::Result<()> {
    let response = client.stop(workload_id).await?;
    println!("{}", response.message);
    Ok(())
}

pub async fn health(client: &SchedulerClient) -> anyhow::Result<()> {
    let summary = client.health_summary().await?;
    print_summary(&summary);
    Ok(())
}

pub async fn check(client: &SchedulerClient) -> anyhow::Result<()> {
    let enabled = color::should_colorize();
    let summary = client.force_check().await?;
    println!(
        "{}",
        color::paint(color::codes::OK, "✓ Health check completed", enabled)
    );
    print_summary(&summary);
    Ok(())
}

pub async fn recovery(client: &SchedulerClient) -> anyhow::Result<()> {
    let enabled = color::should_colorize();
    let metrics = client.recovery_metrics().await?;
    println!("{}", color::header("=== Recovery Metrics ===", enabled));
    println!("Pending recoveries: {}", metrics.failed_workloads.len());
    println!("Desired state count: {}", metrics.desired_state_count);

    for id in &metrics.failed_workloads {
        println!("  - {id}");
    }

    if !metrics.health_checks.is_empty() {
        println!();
        println!("{}", color::header("=== Health Checks ===", enabled));
        let mut keys: Vec<_> = metrics.health_checks.keys().collect();
        keys.sort();
        let rows: Vec<Vec<String>> = keys
            .iter()
            .filter_map(|k| metrics.health_checks.get(*k).map(|c| (k, c)))
            .map(|(key, check)| {
                vec![
                    key.to_string(),
                    color::node_status(check.status, enabled),
                    check.consecutive_failures.to_string(),
                    output::format_response_time(Some(check.response_time)),
                ]
            })
            .collect();
        print!(
            "{}",
            output::table(&["NODE", "STATUS", "FAILURES", "RESPONSE"], &rows)
        );
    }
    Ok(())
}

fn print_summary(summary: &herd_daemon::HealthSummary) {
    let enabled = color::should_colorize();
    println!("{}", color::header("=== Health Summary ===", enabled));
    println!("Total nodes: {}", summary.total_nodes);
    println!("Online nodes: {}", summary.online_nodes);
    println!("Offline nodes: {}", summary.offline_nodes);
    println!("Pending recoveries: {}", summary.failed_workloads);
    println!("Desired workloads: {}", summary.desired_workloads);

    if !summary.node_details.is_empty() {
        println!();
        println!("{}", color::header("=== Node Details ===", enabled));
        let rows: Vec<Vec<String>> = summary
            .node_details
            .iter()
            .map(|d| {
                vec![
                    d.node_key.clone(),
                    color::node_status(d.status, enabled),
                    format!("{:.1}", d.cpu_usage),
                    format!("{:.1}", d.memory_usage),
                    d.consecutive_failures.to_string(),
                    output::format_response_time(d.response_time),
                ]
            })
            .collect();
        print!(
            "{}",
            output::table(
                &["NODE", "STATUS", "CPU %", "MEM %", "FAILURES", "RESPONSE"],
                &rows
            )
        );
    }
}
