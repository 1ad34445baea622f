use colored::Colorize;

pub fn print_banner() {
    println!(
        "{}",
        "winsweep - bounded storage cleanup for managed endpoints"
            .bold()
            .cyan()
    );
    println!();
}

pub fn print_estimate_header() {
    println!("{}", "=== Estimated reclaimable space ===".bold().white());
}

pub fn print_estimate_row(label: &str, size: &str) {
    println!("  {:<28} {}", label, size.yellow());
}

pub fn print_estimate_note() {
    println!();
    println!(
        "{}",
        "Estimates are unpruned totals; a sweep never touches skipped or \
         protected branches, so it may free less."
            .dimmed()
    );
}

pub fn print_category_result(label: &str, deleted: u64, skipped: u64, freed: &str) {
    println!(
        "  {:<28} deleted {} skipped {}  {}",
        label,
        deleted.to_string().green(),
        skipped.to_string().yellow(),
        freed.green()
    );
}

pub fn print_separator() {
    println!("  {}", "─".repeat(60).dimmed());
}

pub fn print_grand_total(freed: &str) {
    println!("  {:<28} {}", "Total freed:".bold(), freed.green().bold());
    println!();
}

pub fn print_disk_line(when: &str, available: &str, total: &str) {
    println!(
        "  {} {} free of {}",
        format!("{when}:").bold(),
        available.green(),
        total
    );
}

pub fn print_dry_run_footer() {
    println!(
        "{}",
        "This was a dry run. Re-run with --confirm to delete."
            .yellow()
            .bold()
    );
}

pub fn print_no_confirm_warning() {
    println!(
        "{}",
        "No --confirm flag provided. Running as dry-run."
            .yellow()
            .bold()
    );
    println!();
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}
