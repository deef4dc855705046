use std::fs;
use std::path::Path;

use rigfit_core::{CatalogView, CpuPart, GpuPart, MemoryGeneration, MotherboardPart, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use MemoryGeneration::{Ddr4, Ddr5};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy)]
struct GpuRecord {
    name: &'static str,
    architecture: &'static str,
    price: f64,
    memory_gb: u32,
    cores: u32,
}

#[derive(Debug, Clone, Copy)]
struct CpuRecord {
    name: &'static str,
    price: f64,
    single_thread: u32,
    multi_thread: u32,
    socket: &'static str,
    memory: &'static [MemoryGeneration],
}

#[derive(Debug, Clone, Copy)]
struct MotherboardRecord {
    name: &'static str,
    price: f64,
    socket: &'static str,
    memory: MemoryGeneration,
    chipset: &'static str,
}

const fn gpu(
    name: &'static str,
    architecture: &'static str,
    price: f64,
    memory_gb: u32,
    cores: u32,
) -> GpuRecord {
    GpuRecord {
        name,
        architecture,
        price,
        memory_gb,
        cores,
    }
}

const ADA: &str = "Ada Lovelace (4000)";
const AMPERE: &str = "Ampere (3000)";
const RDNA3: &str = "RDNA 3 (7000)";
const RDNA2: &str = "RDNA 2 (6000)";

// Shader counts for Radeon cards sit in the `cores` column.
static GPU_RECORDS: [GpuRecord; 20] = [
    gpu("NVIDIA GeForce RTX 4090", ADA, 1599.0, 24, 16_384),
    gpu("NVIDIA GeForce RTX 4080 SUPER", ADA, 999.0, 16, 10_240),
    gpu("NVIDIA GeForce RTX 4070 Ti SUPER", ADA, 799.0, 16, 8_448),
    gpu("NVIDIA GeForce RTX 4070 SUPER", ADA, 599.0, 12, 7_168),
    gpu("NVIDIA GeForce RTX 4060 Ti (16GB)", ADA, 499.0, 16, 4_352),
    gpu("NVIDIA GeForce RTX 4060", ADA, 299.0, 8, 3_072),
    gpu("NVIDIA GeForce RTX 3090 Ti", AMPERE, 899.0, 24, 10_752),
    gpu("NVIDIA GeForce RTX 3080", AMPERE, 699.0, 10, 8_704),
    gpu("NVIDIA GeForce RTX 3070", AMPERE, 499.0, 8, 5_888),
    gpu("NVIDIA GeForce RTX 3060 Ti", AMPERE, 399.0, 8, 4_864),
    gpu("NVIDIA GeForce RTX 3050", AMPERE, 249.0, 8, 2_560),
    gpu("AMD Radeon RX 7900 XTX", RDNA3, 999.0, 24, 6_144),
    gpu("AMD Radeon RX 7900 XT", RDNA3, 799.0, 20, 5_376),
    gpu("AMD Radeon RX 7800 XT", RDNA3, 499.0, 16, 3_840),
    gpu("AMD Radeon RX 7700 XT", RDNA3, 449.0, 12, 3_456),
    gpu("AMD Radeon RX 7600", RDNA3, 269.0, 8, 2_048),
    gpu("AMD Radeon RX 6900 XT", RDNA2, 649.0, 16, 5_120),
    gpu("AMD Radeon RX 6700 XT", RDNA2, 479.0, 12, 2_560),
    gpu("AMD Radeon RX 6600 XT", RDNA2, 379.0, 8, 2_048),
    gpu("AMD Radeon RX 6500 XT", RDNA2, 199.0, 4, 1_024),
];

static CPU_RECORDS: [CpuRecord; 10] = [
    CpuRecord {
        name: "Intel Core i9-14900K",
        price: 569.0,
        single_thread: 4_930,
        multi_thread: 63_900,
        socket: "LGA 1700",
        memory: &[Ddr5],
    },
    CpuRecord {
        name: "Intel Core i7-14700K",
        price: 389.0,
        single_thread: 4_590,
        multi_thread: 50_800,
        socket: "LGA 1700",
        memory: &[Ddr5],
    },
    CpuRecord {
        name: "Intel Core i5-14600K",
        price: 279.0,
        single_thread: 4_300,
        multi_thread: 36_500,
        socket: "LGA 1700",
        memory: &[Ddr5],
    },
    CpuRecord {
        name: "Intel Core i5-13400F",
        price: 185.0,
        single_thread: 3_820,
        multi_thread: 25_000,
        socket: "LGA 1700",
        memory: &[Ddr4, Ddr5],
    },
    CpuRecord {
        name: "AMD Ryzen 9 7950X3D",
        price: 690.0,
        single_thread: 4_170,
        multi_thread: 61_000,
        socket: "AM5",
        memory: &[Ddr5],
    },
    CpuRecord {
        name: "AMD Ryzen 7 7800X3D",
        price: 350.0,
        single_thread: 4_120,
        multi_thread: 34_400,
        socket: "AM5",
        memory: &[Ddr5],
    },
    CpuRecord {
        name: "AMD Ryzen 5 7600X",
        price: 199.0,
        single_thread: 3_980,
        multi_thread: 25_800,
        socket: "AM5",
        memory: &[Ddr5],
    },
    CpuRecord {
        name: "AMD Ryzen 9 5950X",
        price: 499.0,
        single_thread: 3_500,
        multi_thread: 45_700,
        socket: "AM4",
        memory: &[Ddr4],
    },
    CpuRecord {
        name: "AMD Ryzen 7 5800X3D",
        price: 315.0,
        single_thread: 3_480,
        multi_thread: 26_000,
        socket: "AM4",
        memory: &[Ddr4],
    },
    CpuRecord {
        name: "Intel Core i9-11900K",
        price: 299.0,
        single_thread: 3_500,
        multi_thread: 28_000,
        socket: "LGA 1200",
        memory: &[Ddr4],
    },
];

static MOTHERBOARD_RECORDS: [MotherboardRecord; 8] = [
    MotherboardRecord {
        name: "ASUS ROG STRIX X670E-E GAMING WIFI",
        price: 499.0,
        socket: "AM5",
        memory: Ddr5,
        chipset: "X670E",
    },
    MotherboardRecord {
        name: "MSI MAG B650 TOMAHAWK WIFI",
        price: 199.0,
        socket: "AM5",
        memory: Ddr5,
        chipset: "B650",
    },
    MotherboardRecord {
        name: "Gigabyte AORUS ELITE B650",
        price: 179.0,
        socket: "AM5",
        memory: Ddr5,
        chipset: "B650",
    },
    MotherboardRecord {
        name: "MSI MPG Z790 CARBON WIFI",
        price: 399.0,
        socket: "LGA 1700",
        memory: Ddr5,
        chipset: "Z790",
    },
    MotherboardRecord {
        name: "ASUS PRIME B760-PLUS",
        price: 159.0,
        socket: "LGA 1700",
        memory: Ddr5,
        chipset: "B760",
    },
    MotherboardRecord {
        name: "Gigabyte H610M S2H",
        price: 99.0,
        socket: "LGA 1700",
        memory: Ddr4,
        chipset: "H610",
    },
    MotherboardRecord {
        name: "ASUS ROG STRIX X570-F GAMING",
        price: 249.0,
        socket: "AM4",
        memory: Ddr4,
        chipset: "X570",
    },
    MotherboardRecord {
        name: "Gigabyte B550 GAMING X V2",
        price: 129.0,
        socket: "AM4",
        memory: Ddr4,
        chipset: "B550",
    },
];

pub fn gpus() -> Vec<GpuPart> {
    GPU_RECORDS
        .iter()
        .map(|r| GpuPart {
            name: r.name.to_string(),
            price: r.price,
            cores: r.cores,
            memory_gb: r.memory_gb,
            architecture: Some(r.architecture.to_string()),
        })
        .collect()
}

pub fn cpus() -> Vec<CpuPart> {
    CPU_RECORDS
        .iter()
        .map(|r| CpuPart {
            name: r.name.to_string(),
            price: r.price,
            single_thread: r.single_thread,
            multi_thread: r.multi_thread,
            socket: r.socket.to_string(),
            memory: r.memory.to_vec(),
        })
        .collect()
}

pub fn motherboards() -> Vec<MotherboardPart> {
    MOTHERBOARD_RECORDS
        .iter()
        .map(|r| MotherboardPart {
            name: r.name.to_string(),
            price: r.price,
            chipset: r.chipset.to_string(),
            socket: r.socket.to_string(),
            memory: r.memory,
        })
        .collect()
}

/// Owned part tables, either built in or loaded from JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub gpus: Vec<GpuPart>,
    #[serde(default)]
    pub cpus: Vec<CpuPart>,
    #[serde(default)]
    pub motherboards: Vec<MotherboardPart>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            gpus: gpus(),
            cpus: cpus(),
            motherboards: motherboards(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn view(&self) -> CatalogView<'_> {
        CatalogView {
            gpus: &self.gpus,
            cpus: &self.cpus,
            motherboards: &self.motherboards,
        }
    }

    pub fn len(&self) -> usize {
        self.gpus.len() + self.cpus.len() + self.motherboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names must be present and unique per table; prices finite and non-negative.
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_table("gpus", &self.gpus)?;
        validate_table("cpus", &self.cpus)?;
        validate_table("motherboards", &self.motherboards)?;
        if let Some(cpu) = self.cpus.iter().find(|cpu| cpu.memory.is_empty()) {
            return Err(CatalogError::InvalidInput(format!(
                "cpus: {:?} lists no supported memory",
                cpu.name
            )));
        }
        Ok(())
    }
}

fn validate_table<P: Part>(table: &str, parts: &[P]) -> Result<(), CatalogError> {
    let mut seen = std::collections::HashSet::new();
    for part in parts {
        let name = part.name().trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput(format!(
                "{table}: part name must not be empty"
            )));
        }
        if !seen.insert(name) {
            return Err(CatalogError::InvalidInput(format!(
                "{table}: duplicate part {name:?}"
            )));
        }
        let price = part.price();
        if !(price.is_finite() && price >= 0.0) {
            return Err(CatalogError::InvalidInput(format!(
                "{table}: {name:?} has invalid price {price}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_complete_and_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.gpus.len(), 20);
        assert_eq!(catalog.cpus.len(), 10);
        assert_eq!(catalog.motherboards.len(), 8);
        assert_eq!(catalog.len(), 38);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn builtin_chipsets_are_all_tiered() {
        let scale = rigfit_core::MotherboardScale::default();
        for board in motherboards() {
            assert!(scale.tier(&board.chipset).is_some(), "{}", board.chipset);
        }
    }

    #[test]
    fn dual_memory_cpu_keeps_both_generations() {
        let cpu = cpus()
            .into_iter()
            .find(|cpu| cpu.name == "Intel Core i5-13400F");
        assert_eq!(cpu.map(|cpu| cpu.memory), Some(vec![Ddr4, Ddr5]));
    }

    #[test]
    fn parses_json_catalog_with_missing_tables() {
        let raw = r#"{
            "gpus": [
                {"name": "Test GPU", "price": 450.0, "cores": 6000, "memory_gb": 12}
            ]
        }"#;
        let catalog = Catalog::from_json_str(raw).unwrap_or_default();
        assert_eq!(catalog.gpus.len(), 1);
        assert!(catalog.cpus.is_empty());
        assert_eq!(catalog.gpus.first().map(|g| g.architecture.clone()), Some(None));
    }

    #[test]
    fn rejects_missing_fields_and_bad_prices() {
        let missing = r#"{"gpus": [{"name": "No cores", "price": 10.0, "memory_gb": 8}]}"#;
        assert!(matches!(
            Catalog::from_json_str(missing),
            Err(CatalogError::Serde(_))
        ));

        let negative = r#"{"gpus": [{"name": "Cheap", "price": -1.0, "cores": 10, "memory_gb": 8}]}"#;
        assert!(matches!(
            Catalog::from_json_str(negative),
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut catalog = Catalog::builtin();
        let first = catalog.gpus.first().cloned();
        catalog.gpus.extend(first);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidInput(msg)) if msg.contains("duplicate")
        ));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "rigfit-catalog-{}.json",
            std::process::id()
        ));
        let body = serde_json::to_string(&Catalog::builtin()).unwrap_or_default();
        std::fs::write(&path, body).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
        let loaded = Catalog::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.ok(), Some(Catalog::builtin()));
    }
}
