fn main() -> Result<(), eframe::Error> {
    postgrid_frontend::run_frontend()
}
