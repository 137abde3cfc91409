fn main() -> anyhow::Result<()> {
    movie_vectors::cli::run()
}
