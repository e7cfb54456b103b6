fn main() {
    gpxmap::run();
}
