//! Visualization of winning tours over a geographic coordinate table.
//!
//! Generates an SVG map of a tour from a city/latitude/longitude table,
//! with optional PNG export.

use crate::error::AcsError;
use crate::graph::CityGraph;
use crate::tour::Tour;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
#[cfg(not(feature = "resvg"))]
use std::process::Command;
#[cfg(feature = "resvg")]
use resvg::render;
#[cfg(feature = "resvg")]
use resvg::tiny_skia::{Pixmap, Transform};
#[cfg(feature = "resvg")]
use resvg::usvg;
#[cfg(feature = "resvg")]
use resvg::usvg::TreeParsing;
#[cfg(feature = "resvg")]
use resvg::FitTo;

/// City name to (latitude, longitude) mapping.
#[derive(Debug, Clone, Default)]
pub struct GeoTable {
    coords: HashMap<String, (f64, f64)>,
}

impl GeoTable {
    /// Load a semicolon-delimited `city;latitude;longitude` table.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, AcsError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, AcsError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut coords = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            if record.len() < 3 {
                return Err(AcsError::InvalidGraph(
                    "coordinate rows need city;latitude;longitude".to_string(),
                ));
            }
            let name = record[0].to_string();
            let lat: f64 = record[1].parse().map_err(|_| {
                AcsError::InvalidGraph(format!("invalid latitude '{}' for '{}'", &record[1], name))
            })?;
            let lon: f64 = record[2].parse().map_err(|_| {
                AcsError::InvalidGraph(format!("invalid longitude '{}' for '{}'", &record[2], name))
            })?;
            coords.insert(name, (lat, lon));
        }
        Ok(GeoTable { coords })
    }

    pub fn get(&self, city: &str) -> Option<(f64, f64)> {
        self.coords.get(city).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// SVG map generator for tours.
pub struct TourMap {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// City marker radius
    pub node_radius: f64,
}

impl Default for TourMap {
    fn default() -> Self {
        TourMap {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 6.0,
        }
    }
}

impl TourMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the tour over the coordinate table as an SVG document.
    /// Uses an equirectangular projection (longitude as x, latitude as y).
    pub fn generate_svg(
        &self,
        graph: &CityGraph,
        tour: &Tour,
        geo: &GeoTable,
    ) -> Result<String, AcsError> {
        let mut points = Vec::with_capacity(tour.path().len());
        for &city in tour.path() {
            let name = graph.city(city);
            let (lat, lon) = geo
                .get(name)
                .ok_or_else(|| AcsError::UnknownCity(name.to_string()))?;
            points.push((name, lon, lat));
        }

        let min_x = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let min_y = points.iter().map(|p| p.2).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.2).fold(f64::NEG_INFINITY, f64::max);

        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1e-9);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1e-9);
        let scale = scale_x.min(scale_y);

        let transform = |lon: f64, lat: f64| -> (f64, f64) {
            let tx = self.margin + (lon - min_x) * scale;
            let ty = self.height - self.margin - (lat - min_y) * scale;
            (tx, ty)
        };

        let mut svg = String::new();
        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .city {{ fill: #3498db; stroke: #2c3e50; stroke-width: 2; }}
    .origin {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 2; }}
    .edge {{ stroke: #34495e; stroke-width: 2; fill: none; }}
    .label {{ font-family: Arial; font-size: 11px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r#"<text x="{}" y="25" class="title">ACS tour | {} cities | length {:.2}</text>
"#,
            self.margin,
            points.len(),
            tour.length()
        ));

        for i in 0..points.len() {
            let (_, lon1, lat1) = points[i];
            let (_, lon2, lat2) = points[(i + 1) % points.len()];
            let (x1, y1) = transform(lon1, lat1);
            let (x2, y2) = transform(lon2, lat2);
            svg.push_str(&format!(
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="edge"/>
"#,
                x1, y1, x2, y2
            ));
        }

        for (i, &(name, lon, lat)) in points.iter().enumerate() {
            let (x, y) = transform(lon, lat);
            let class = if i == 0 { "origin" } else { "city" };
            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.node_radius, class
            ));
            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                x,
                y - self.node_radius - 3.0,
                name
            ));
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())
    }

    /// Save SVG as PNG using the native resvg renderer.
    #[cfg(feature = "resvg")]
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let opt = usvg::Options::default();
        let rtree = usvg::Tree::from_str(svg, &opt).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::Other, format!("usvg parse error: {}", e))
        })?;
        let mut pixmap = Pixmap::new(self.width as u32, self.height as u32)
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "Failed to create pixmap"))?;
        render(&rtree, FitTo::Original, Transform::default(), pixmap.as_mut())
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "resvg render failed"))?;
        pixmap.save_png(path.as_ref()).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::Other, format!("save_png failed: {}", e))
        })
    }

    /// Save SVG as PNG using an external converter if available.
    /// Tries `rsvg-convert`, then `magick convert`, then `inkscape`.
    #[cfg(not(feature = "resvg"))]
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        let tmp_svg = path.with_extension("svg.tmp");
        std::fs::write(&tmp_svg, svg)?;

        let converters: [(&str, Vec<String>); 3] = [
            (
                "rsvg-convert",
                vec![
                    "-o".to_string(),
                    path.to_string_lossy().to_string(),
                    tmp_svg.to_string_lossy().to_string(),
                ],
            ),
            (
                "magick",
                vec![
                    "convert".to_string(),
                    tmp_svg.to_string_lossy().to_string(),
                    path.to_string_lossy().to_string(),
                ],
            ),
            (
                "inkscape",
                vec![
                    tmp_svg.to_string_lossy().to_string(),
                    "--export-type=png".to_string(),
                    "--export-filename".to_string(),
                    path.to_string_lossy().to_string(),
                ],
            ),
        ];

        for (cmd, args) in &converters {
            if let Ok(status) = Command::new(cmd).args(args).status() {
                if status.success() {
                    let _ = std::fs::remove_file(&tmp_svg);
                    return Ok(());
                }
            }
        }

        let _ = std::fs::remove_file(&tmp_svg);
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "No SVG->PNG converter succeeded (tried rsvg-convert, magick, inkscape)",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_graph() -> CityGraph {
        let d = 2.0f64.sqrt();
        CityGraph::from_matrix(
            vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            vec![
                vec![0.0, 1.0, d, 1.0],
                vec![1.0, 0.0, 1.0, d],
                vec![d, 1.0, 0.0, 1.0],
                vec![1.0, d, 1.0, 0.0],
            ],
        )
        .unwrap()
    }

    fn geo_table() -> GeoTable {
        let csv = "\
city;latitude;longitude
A;0.0;0.0
B;0.0;1.0
C;1.0;1.0
D;1.0;0.0
";
        GeoTable::from_csv_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_geo_table_parsing() {
        let geo = geo_table();
        assert_eq!(geo.len(), 4);
        assert_eq!(geo.get("C"), Some((1.0, 1.0)));
        assert_eq!(geo.get("Z"), None);
    }

    #[test]
    fn test_svg_contains_tour() {
        let graph = square_graph();
        let tour = Tour::new(vec![0, 1, 2, 3], 4.0);
        let map = TourMap::new();
        let svg = map.generate_svg(&graph, &tour, &geo_table()).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("length 4.00"));
        for name in ["A", "B", "C", "D"] {
            assert!(svg.contains(&format!(">{}</text>", name)));
        }
    }

    #[test]
    fn test_missing_coordinate_is_reported() {
        let graph = square_graph();
        let tour = Tour::new(vec![0, 1, 2, 3], 4.0);
        let geo = GeoTable::from_csv_reader("city;latitude;longitude\nA;0;0\n".as_bytes()).unwrap();
        let map = TourMap::new();
        assert!(matches!(
            map.generate_svg(&graph, &tour, &geo),
            Err(AcsError::UnknownCity(_))
        ));
    }
}
