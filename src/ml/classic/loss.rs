/// A loss metric comparing true labels with predicted labels.
///
/// The predictor only calls this; it never interprets the labels itself.
/// Any `Fn(&[L], &[L]) -> f64` closure is a `Loss`.
pub trait Loss<L> {
    fn loss(&self, y_true: &[L], y_pred: &[L]) -> f64;
}

impl<L, F> Loss<L> for F
where
    F: Fn(&[L], &[L]) -> f64,
{
    fn loss(&self, y_true: &[L], y_pred: &[L]) -> f64 {
        self(y_true, y_pred)
    }
}

/// Misclassification rate: the fraction of positions where the prediction
/// differs from the true label. Returns 0.0 for empty input.
///
/// Positions present in only one slice have no matching label and count as
/// misclassified, so a length mismatch always shows up in the loss.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroOneLoss;

impl<L: PartialEq> Loss<L> for ZeroOneLoss {
    fn loss(&self, y_true: &[L], y_pred: &[L]) -> f64 {
        let n = y_true.len().max(y_pred.len());
        if n == 0 {
            return 0.0;
        }
        let unpaired = y_true.len().abs_diff(y_pred.len());
        let wrong = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| t != p)
            .count();
        (wrong + unpaired) as f64 / n as f64
    }
}
