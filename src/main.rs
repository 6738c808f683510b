fn main() -> color_eyre::Result<()> {
    globe_renderer::run()
}
