use indicatif::{ProgressBar, ProgressStyle};
use resi_import::{BatchOutcome, ImportObserver};
use resi_model::ImportRunStats;

const TEMPLATE: &str = "[{bar:40.cyan/blue}] {percent:>3}% | {pos}/{len} | {msg}";

/// Drives a terminal progress bar from importer events.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(total: usize, stats: &ImportRunStats) -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        let bar = ProgressBar::new(total as u64).with_style(style);
        let reporter = Self { bar };
        reporter.update(stats);
        reporter
    }

    fn update(&self, stats: &ImportRunStats) {
        self.bar.set_position(stats.processed() as u64);
        self.bar
            .set_message(format!("✅ {} | ❌ {}", stats.success, stats.failed));
    }

    pub fn finish(&self) {
        self.bar.finish();
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl ImportObserver for ProgressReporter {
    fn on_record(&mut self, stats: &ImportRunStats) {
        self.update(stats);
    }

    fn on_batch_finished(&mut self, batch: usize, outcome: BatchOutcome, stats: &ImportRunStats) {
        if let BatchOutcome::Degraded { failed, .. } = outcome
            && failed > 0
        {
            self.bar
                .println(format!("batch {}: {failed} record(s) could not be inserted", batch + 1));
        }
        self.update(stats);
    }
}
