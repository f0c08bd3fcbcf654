//! Widths command implementation.

use candlefold_lib::{BucketWidth, ChartMode};

/// List the named bucket widths and the chart mode each one backs.
pub(crate) fn list_widths() {
    println!("{:<8} {:<10} {:<10}", "WIDTH", "SECONDS", "MODE");
    println!("{}", "-".repeat(30));

    for width in BucketWidth::presets() {
        let mode = ChartMode::all()
            .iter()
            .find(|mode| mode.bucket_width() == *width)
            .map_or("-", ChartMode::as_str);
        println!("{:<8} {:<10} {:<10}", width.label(), width.seconds(), mode);
    }

    println!("\nAny width can also be given as <n>s, <n>m, <n>h, <n>d, or plain seconds.");
}
