//! Interactive exploration of one sheet: collapse, zoom, zoom out, reset.
//!
//! By default we use `rustyline` for line editing and history.
//! A minimal stdin-based fallback exists behind `--no-default-features`.
//! Every command that changes view state rebuilds the tree from scratch.

use anyhow::{anyhow, Result};
use colored::Colorize;
use orgchart_core::OrgChart;
#[cfg(not(feature = "repl-rustyline"))]
use std::io::{self, Write};

use crate::render::{node_label, render_text, TextStyle};

pub struct ExploreState {
    pub chart: OrgChart,
    pub title: String,
    pub style: TextStyle,
    /// Print the tree after every change.
    pub echo_tree: bool,
}

pub enum ReplControl {
    Continue,
    Exit,
}

pub fn cmd_explore(state: &mut ExploreState) -> Result<()> {
    #[cfg(feature = "repl-rustyline")]
    {
        return cmd_explore_rustyline(state);
    }
    #[cfg(not(feature = "repl-rustyline"))]
    {
        return cmd_explore_simple(state);
    }
}

/// Run commands non-interactively, one per line.
pub fn cmd_explore_script(
    state: &mut ExploreState,
    lines: &[String],
    continue_on_error: bool,
    quiet: bool,
) -> Result<()> {
    for (idx, raw_line) in lines.iter().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !quiet {
            println!("orgchart> {line}");
        }
        match dispatch_line(state, line) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => {
                if continue_on_error {
                    eprintln!("{} {e}", "error:".red().bold());
                } else {
                    return Err(anyhow!("explore script failed at line {}: {e}", idx + 1));
                }
            }
        }
    }
    Ok(())
}

fn print_banner(state: &ExploreState) {
    println!("{}", state.title.green().bold());
    println!(
        "{} records. Type `help` for commands. Type `exit` to quit.\n",
        state.chart.records().len()
    );
}

#[cfg(not(feature = "repl-rustyline"))]
fn cmd_explore_simple(state: &mut ExploreState) -> Result<()> {
    print_banner(state);
    let stdin = io::stdin();
    loop {
        print!("{}", "orgchart> ".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        match dispatch_line(state, line.trim()) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e}", "error:".red().bold()),
        }
    }
    Ok(())
}

#[cfg(feature = "repl-rustyline")]
fn cmd_explore_rustyline(state: &mut ExploreState) -> Result<()> {
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    print_banner(state);
    let mut rl = DefaultEditor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;

    loop {
        let line = match rl.readline("orgchart> ") {
            Ok(l) => l,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line)
            .map_err(|e| anyhow!("failed to record history: {e}"))?;

        match dispatch_line(state, line) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e}", "error:".red().bold()),
        }
    }
    Ok(())
}

/// Split `cmd rest of line`; ids may contain spaces, so the argument is the
/// whole remainder.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    }
}

fn required<'a>(cmd: &str, arg: &'a str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(anyhow!("usage: {cmd} <employee id>"))
    } else {
        Ok(arg)
    }
}

pub fn dispatch_line(state: &mut ExploreState, line: &str) -> Result<ReplControl> {
    let (cmd, arg) = split_command(line);
    match cmd {
        "" => {}
        "help" | "?" => print_help(),
        "exit" | "quit" => return Ok(ReplControl::Exit),
        "tree" | "show" => print_tree(state)?,
        "toggle" | "collapse" | "expand" => {
            let id = required(cmd, arg)?;
            if !state.chart.records().contains(id) {
                return Err(anyhow!("no employee with id `{id}`"));
            }
            if !state.chart.toggle_collapse(id) {
                println!("`{id}` has no direct reports; nothing to collapse");
                return Ok(ReplControl::Continue);
            }
            after_change(state)?;
        }
        "zoom" => {
            let id = required(cmd, arg)?;
            if !state.chart.records().contains(id) {
                return Err(anyhow!("no employee with id `{id}`"));
            }
            if !state.chart.zoom_in(id) {
                println!("already showing `{id}` as root");
                return Ok(ReplControl::Continue);
            }
            after_change(state)?;
        }
        "out" | "back" => {
            if !state.chart.zoom_out() {
                println!("already at the top of the zoom history");
                return Ok(ReplControl::Continue);
            }
            after_change(state)?;
        }
        "reset" => {
            state.chart.reset_to_root();
            after_change(state)?;
        }
        "info" => {
            let id = required(cmd, arg)?;
            print_info(state, id)?;
        }
        "anomalies" => {
            let tree = state.chart.tree()?;
            if tree.anomalies.is_empty() {
                println!("no anomalies");
            }
            for anomaly in &tree.anomalies {
                println!("{} {anomaly}", "warning:".yellow().bold());
            }
        }
        other => return Err(anyhow!("unknown command `{other}` (try `help`)")),
    }
    Ok(ReplControl::Continue)
}

fn after_change(state: &ExploreState) -> Result<()> {
    if state.echo_tree {
        print_tree(state)
    } else {
        Ok(())
    }
}

fn print_tree(state: &ExploreState) -> Result<()> {
    let tree = state.chart.tree()?;
    print!("{}", render_text(&tree.root, state.chart.config(), state.style));
    Ok(())
}

fn print_info(state: &ExploreState, id: &str) -> Result<()> {
    let tree = state.chart.tree()?;
    let node = tree
        .root
        .find(id)
        .ok_or_else(|| anyhow!("`{id}` is not in the displayed tree"))?;

    println!("{}", node_label(node, state.chart.config(), state.style));
    for attr in &node.attributes {
        println!("  {}: {}", attr.name, attr.value);
    }

    let controls = state.chart.controls(id);
    let mut actions = Vec::new();
    if node.has_children {
        actions.push(if controls.is_collapsed { "expand" } else { "collapse" });
    }
    if controls.show_zoom_in {
        actions.push("zoom");
    }
    if controls.can_zoom_out {
        actions.push("out");
    }
    if !actions.is_empty() {
        println!("  actions: {}", actions.join(", "));
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  tree               print the displayed tree");
    println!("  toggle <id>        collapse/expand a manager's reports");
    println!("  zoom <id>          show only the subtree under <id>");
    println!("  out                return to the previous root");
    println!("  reset              back to the full tree, everything expanded");
    println!("  info <id>          attributes and available actions for one node");
    println!("  anomalies          data-quality findings for the current tree");
    println!("  exit               quit");
}
