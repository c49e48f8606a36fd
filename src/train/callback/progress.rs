//! Live per-epoch progress display

use indicatif::{ProgressBar, ProgressStyle};

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::Result;

const TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

/// Progress bar per epoch showing the running losses and scores
///
/// The message reads
/// `[Epoch: e/N] D Loss: .. G Loss: .. D(x): .. D(G(z)): ..` and is
/// refreshed after every step. The bar is hidden when `visible` is false;
/// epoch summaries still go to the log.
pub struct ProgressCallback {
    visible: bool,
    bar: Option<ProgressBar>,
}

impl ProgressCallback {
    /// Create progress callback
    pub fn new(visible: bool) -> Self {
        Self { visible, bar: None }
    }

    fn make_bar(&self, len: usize) -> ProgressBar {
        if !self.visible {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("##-"));
        }
        bar
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Status line shown for the running metrics of an epoch
pub fn status_line(ctx: &CallbackContext) -> String {
    format!(
        "[Epoch: {}/{}] D Loss: {:.4} G Loss: {:.4} D(x): {:.4} D(G(z)): {:.4}",
        ctx.epoch,
        ctx.max_epochs,
        ctx.metrics.d_loss,
        ctx.metrics.g_loss,
        ctx.metrics.d_score,
        ctx.metrics.g_score
    )
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> Result<CallbackAction> {
        self.bar = Some(self.make_bar(ctx.steps_per_epoch));
        Ok(CallbackAction::Continue)
    }

    fn on_step_end(&mut self, ctx: &CallbackContext) -> Result<CallbackAction> {
        if let Some(bar) = &self.bar {
            bar.set_position(ctx.step as u64);
            bar.set_message(status_line(ctx));
        }
        Ok(CallbackAction::Continue)
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> Result<CallbackAction> {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        tracing::info!(
            "{} lr_g: {:.2e} ({:.1}s)",
            status_line(ctx),
            ctx.lr_g,
            ctx.elapsed_secs
        );
        Ok(CallbackAction::Continue)
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::EpochMetrics;

    #[test]
    fn test_status_line_format() {
        let ctx = CallbackContext {
            epoch: 3,
            max_epochs: 150,
            metrics: EpochMetrics {
                d_loss: 0.5,
                g_loss: 0.25,
                d_score: 0.9,
                g_score: 0.1,
            },
            ..Default::default()
        };
        assert_eq!(
            status_line(&ctx),
            "[Epoch: 3/150] D Loss: 0.5000 G Loss: 0.2500 D(x): 0.9000 D(G(z)): 0.1000"
        );
    }

    #[test]
    fn test_hidden_progress_lifecycle() {
        let mut progress = ProgressCallback::new(false);
        let ctx = CallbackContext {
            epoch: 1,
            max_epochs: 2,
            steps_per_epoch: 4,
            step: 1,
            ..Default::default()
        };
        assert_eq!(progress.on_epoch_begin(&ctx).unwrap(), CallbackAction::Continue);
        assert!(progress.bar.is_some());
        assert_eq!(progress.on_step_end(&ctx).unwrap(), CallbackAction::Continue);
        assert_eq!(progress.on_epoch_end(&ctx).unwrap(), CallbackAction::Continue);
        assert!(progress.bar.is_none());
        assert_eq!(progress.name(), "ProgressCallback");
    }
}
