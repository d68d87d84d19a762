use owo_colors::OwoColorize;
use scopelint::adapter::{default_registry, AdapterRegistry};
use scopelint::analysis::{analyze, Analysis};
use scopelint::config::{default_config_path, load_config, write_config, ScopelintConfig};
use scopelint::ignore::{collect_files, IgnoreFilter};
use scopelint::output::{is_quiet, OutputFormat};
use scopelint::scope::ScopeId;
use scopelint::ui::{self, Icons, ProgressManager, ProgressMessage, ProgressPhase};
use scopelint::{Declaration, FileMessage, FileReport, Linter, RuleName};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Lint every supported file under `paths`. Returns true when any problem was found.
pub fn run_check(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    only: &[RuleName],
    jobs: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let start = Instant::now();
    let config = load_config(config_path)?.unwrap_or_default();
    let options = config.lint_options(only);
    if options.rules.is_empty() {
        anyhow::bail!("no rules enabled; check `disable` in the config or the --rule flags");
    }

    let root = std::env::current_dir()?;
    let registry = default_registry();
    let filter = IgnoreFilter::new(&root, Some(&config.exclude));
    let files = collect_files(paths, &filter, &registry);
    tracing::info!("Checking {} files with {} rules", files.len(), options.rules.len());

    let human = format.is_human();
    if human && !is_quiet() {
        ui::header(&format!("Checking {} files", files.len()));
    }

    let linter = Linter::new(options);
    let workers = jobs
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1)
        .max(1);

    let progress = if human && !is_quiet() {
        Some(ProgressManager::new(files.len()))
    } else {
        None
    };
    let progress_tx = progress.as_ref().map(|(_, tx)| tx.clone());

    let (reports, failures) = check_files(&files, &root, &registry, &linter, workers, progress_tx);

    let problems: usize = reports.iter().map(|r| r.diagnostics.len()).sum();
    if let Some((mut manager, tx)) = progress {
        tx.send(ProgressMessage::Finished { phase: ProgressPhase::Checking }).ok();
        drop(tx);
        manager.finish_with_summary(start.elapsed(), reports.len(), problems);
    }

    if human {
        print_reports(&reports, &linter);
        for (path, message) in &failures {
            ui::error(&format!("{}: {}", path, message));
        }
        if problems == 0 && failures.is_empty() {
            ui::success("No problems found");
        }
    } else {
        let failures: Vec<serde_json::Value> = failures
            .iter()
            .map(|(path, message)| serde_json::json!({ "path": path, "error": message }))
            .collect();
        let data = serde_json::json!({
            "files": reports,
            "errors": failures,
            "problems": problems,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
    }

    Ok(problems > 0)
}

type CheckOutcome = (Vec<FileReport>, Vec<(String, String)>);

fn check_files(
    files: &[PathBuf],
    root: &Path,
    registry: &AdapterRegistry,
    linter: &Linter,
    workers: usize,
    progress: Option<crossbeam::channel::Sender<ProgressMessage>>,
) -> CheckOutcome {
    let (job_tx, job_rx) = crossbeam::channel::unbounded::<&Path>();
    let (result_tx, result_rx) = crossbeam::channel::unbounded::<FileMessage>();

    for file in files {
        job_tx.send(file.as_path()).ok();
    }
    drop(job_tx);

    if let Some(tx) = &progress {
        tx.send(ProgressMessage::Started {
            phase: ProgressPhase::Checking,
            total: files.len(),
        })
        .ok();
    }

    let mut reports = Vec::new();
    let mut failures = Vec::new();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for file in job_rx {
                    result_tx.send(check_file(file, root, registry, linter)).ok();
                }
            });
        }
        drop(result_tx);

        for message in result_rx {
            match message {
                FileMessage::Checked { relative_path, report } => {
                    if let Some(tx) = &progress {
                        tx.send(ProgressMessage::Progress {
                            phase: ProgressPhase::Checking,
                            file: Some(relative_path),
                        })
                        .ok();
                    }
                    reports.push(report);
                }
                FileMessage::Error(path, message) => {
                    tracing::error!("Failed to check {}: {}", path, message);
                    if let Some(tx) = &progress {
                        tx.send(ProgressMessage::Error(format!("{}: {}", path, message))).ok();
                    }
                    failures.push((path, message));
                }
            }
        }
    });

    reports.sort_by(|a, b| a.path.cmp(&b.path));
    failures.sort();
    (reports, failures)
}

fn check_file(file: &Path, root: &Path, registry: &AdapterRegistry, linter: &Linter) -> FileMessage {
    let relative_path = relative_display(file, root);

    let Some(adapter) = registry.find_adapter(file) else {
        return FileMessage::Error(relative_path, "no adapter for this file".to_string());
    };

    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => return FileMessage::Error(relative_path, e.to_string()),
    };

    match linter.lint_source(adapter, &relative_path, &source) {
        Ok(report) => FileMessage::Checked { relative_path, report },
        Err(e) => FileMessage::Error(relative_path, e.to_string()),
    }
}

fn relative_display(file: &Path, root: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let relative = relative.strip_prefix(".").unwrap_or(relative);
    relative.to_string_lossy().replace('\\', "/")
}

fn print_reports(reports: &[FileReport], linter: &Linter) {
    let mut flagged = 0;
    for report in reports.iter().filter(|r| !r.is_clean() || r.has_syntax_errors) {
        ui::file_header(&report.path, report.diagnostics.len());
        if report.has_syntax_errors {
            println!("  {}", ui::muted("syntax errors; results may be incomplete"));
        }
        for diagnostic in &report.diagnostics {
            ui::diagnostic_line(diagnostic);
        }
        if !report.is_clean() {
            flagged += 1;
        }
    }

    if flagged > 0 {
        ui::section("Summary");
        println!("{}", ui::rule_summary_table(&linter.options().rules, reports));
    }
}

/// Print the scope tree of one file with the declarations in each scope.
pub fn run_scopes(file: &Path, config_path: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(config_path)?.unwrap_or_default();
    let options = config.lint_options(&[]).analysis_options();

    let source = std::fs::read_to_string(file)?;
    let registry = default_registry();
    let tree = registry.parse_file(file, &source)?;
    let analysis = analyze(&tree, &source, &options, None);

    if format.is_human() {
        println!(
            "{} {} {}",
            Icons::TREE,
            file.display().style(ui::theme().path.clone()),
            ui::muted(&format!(
                "({} scopes, {} declarations, {} references)",
                analysis.tree().len(),
                analysis.table().declarations().iter().filter(|d| !d.is_builtin()).count(),
                analysis.references().len()
            ))
        );
        let by_scope = declarations_by_scope(&analysis);
        print_scope(&analysis, &by_scope, &source, ScopeId::root(), 0);

        let unresolved = analysis
            .references()
            .iter()
            .filter(|r| analysis.resolved(r.id).is_none())
            .count();
        ui::summary_row("Unresolved references:", &unresolved.to_string());
    } else {
        let declarations: Vec<_> = analysis
            .table()
            .declarations()
            .iter()
            .filter(|d| !d.is_builtin())
            .collect();
        let data = serde_json::json!({
            "path": file.display().to_string(),
            "module": analysis.is_module(),
            "scopes": analysis.tree().scopes(),
            "declarations": declarations,
            "references": analysis.references(),
            "bindings": analysis.bindings(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
    }

    Ok(())
}

/// Source declarations grouped by the scope that holds them, in declaration order
fn declarations_by_scope(analysis: &Analysis) -> HashMap<ScopeId, Vec<&Declaration>> {
    let mut grouped: HashMap<ScopeId, Vec<&Declaration>> = HashMap::new();
    for decl in analysis.table().declarations().iter().filter(|d| !d.is_builtin()) {
        grouped.entry(decl.scope).or_default().push(decl);
    }
    grouped
}

fn print_scope(
    analysis: &Analysis,
    by_scope: &HashMap<ScopeId, Vec<&Declaration>>,
    source: &str,
    scope: ScopeId,
    depth: usize,
) {
    let Some(node) = analysis.tree().get(scope) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let augmentation = if node.global_augmentation { " (global augmentation)" } else { "" };
    println!(
        "{}{}{} {}",
        indent,
        node.kind.as_str().style(ui::theme().header.clone()),
        augmentation,
        ui::dim(&format!("line {}", line_of(source, node.span.start)))
    );

    for decl in by_scope.get(&scope).into_iter().flatten() {
        let location = decl.position().map(|p| p.to_string()).unwrap_or_default();
        println!(
            "{}  {} {} {}",
            indent,
            decl.name,
            ui::muted(decl.kind.as_str()),
            ui::dim(&location)
        );
    }

    for child in &node.children {
        print_scope(analysis, by_scope, source, *child, depth + 1);
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

/// Write a default `scopelint.toml`.
pub fn run_init(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    write_config(&path, &ScopelintConfig::default(), force)?;
    ui::success(&format!("Wrote {}", path.display()));
    Ok(())
}
