/// Diagnostic channel for allocator and collector tracing. Lines go to
/// standard output with a `[DEBUG]` prefix so they are easy to strip from
/// program output.
pub fn debug(message: &str) {
    println!("[DEBUG] {}", message);
}
