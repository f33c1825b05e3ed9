fn main() {
    bake::cli::run();
}
