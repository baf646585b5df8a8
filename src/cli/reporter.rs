// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::commands::NormalsSummary;
use crate::geometry::{GeometryStats, MeshValidation, TriangleMesh};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report analytics and validation for one file
    pub fn report_info(file: &str, stats: &GeometryStats, validation: &MeshValidation) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        stats.print();

        println!("\n{}", "Validation:".bold());
        Self::print_check("Manifold", validation.is_manifold);
        Self::print_check("Closed", validation.is_closed);
        Self::print_check("Consistent winding", validation.has_consistent_winding);
        println!(
            "  {} {}",
            "Boundary edges:".bright_black(),
            validation.boundary_edge_count.to_string().cyan()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report the result of a mesh-producing command
    pub fn report_mesh(action: &str, file: &str, mesh: &TriangleMesh, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", format!("{action}:").bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());
        println!(
            "  {} {}",
            "Vertices:".bright_black(),
            mesh.vertex_count().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Triangles:".bright_black(),
            mesh.triangle_count().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Edges:".bright_black(),
            mesh.edge_count().to_string().cyan()
        );
        println!(
            "  {} {:.6}",
            "Min edge length:".bright_black(),
            mesh.min_edge_length()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    pub fn report_normals(file: &str, summary: &NormalsSummary) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!(
            "{} {} ({})",
            "Normals:".bold(),
            file.cyan(),
            summary.strategy.to_string().yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
        println!(
            "  {} {}   {} {}",
            "Vertices:".bright_black(),
            summary.vertex_count.to_string().cyan(),
            "Isolated:".bright_black(),
            summary.isolated.to_string().cyan()
        );

        println!("\n{}", "Largest deviation from other strategies:".bold());
        for (strategy, degrees) in &summary.deviation_deg {
            let value = format!("{degrees:.4}°");
            let value = if *degrees < 1.0 {
                value.green()
            } else if *degrees < 10.0 {
                value.yellow()
            } else {
                value.red()
            };
            println!("  {:<30} {}", format!("{strategy}:").bright_black(), value);
        }

        println!("\n{}", "Sample:".bold());
        for (position, normal) in &summary.sample {
            println!(
                "  ({:>9.4}, {:>9.4}, {:>9.4})  →  ({:>7.4}, {:>7.4}, {:>7.4})",
                position.x, position.y, position.z, normal.x, normal.y, normal.z
            );
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_check(name: &str, ok: bool) {
        let status = if ok { "yes".green() } else { "no".red() };
        println!("  {} {}", format!("{name}:").bright_black(), status);
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
