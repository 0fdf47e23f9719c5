/// Shows the short code to the operator and reports whether they gave up.
///
/// The grant loop only reads the cancellation flag, once before each new code
/// request. An in-flight poll is never interrupted by it.
pub trait GrantNotifier {
    fn prompt(&self, code: &str);

    fn is_cancelled(&self) -> bool;
}
