fn main() {
    scan_label_pipeline::cli::run();
}
