use std::io::Write;

use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::Result;
use crate::model::CompoundRecord;

/// On-disk layout used when writing a sample dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpLayout {
    #[default]
    JsonArray,
    NdJson,
}

/// A small, realistic catalog used by unit and integration tests.
///
/// Glycerol's class (`Polyol`) never appears in any of its text-indexed
/// fields while Sorbitol's overview mentions "polyol", which lets tests
/// tell exact-field hits apart from full-text hits. Ethylene glycol and
/// propylene glycol share the synonym `Glycol`.
pub fn sample_documents() -> Value {
    json!([
        {
            "hash": "dmso01",
            "name": "Dimethyl Sulfoxide",
            "synonyms": ["DMSO", "Methyl sulfoxide"],
            "overview": "Dimethyl sulfoxide is a penetrating cryoprotectant widely used for freezing cell lines and stem cells.",
            "tags": "penetrating, solvent",
            "written_by": ["A. Fahy"],
            "cas_number": "67-68-5",
            "class": "Sulfoxide",
            "chemical_formula": "(CH3)2SO",
            "molecular_formula": "C2H6OS",
            "molecular_weight": "78.13 g/mol",
            "optimal_conc": "10% v/v",
            "structure_image": "/structures/dmso01.png",
            "references": [
                {"organisation": "Cryobiology", "reference": "Lovelock and Bishop, prevention of freezing damage", "url": "https://example.org/lovelock-1959"}
            ],
            "cell_info": [
                {"cellType": "Fibroblast", "successRate": "85", "referenceURL": null},
                {"cellType": "Oocyte", "successRate": "60", "referenceURL": null}
            ],
            "gras_info": {"found": false, "reference_url": null},
            "date_uploaded": "2024-03-01T10:00:00Z"
        },
        {
            "hash": "glyc02",
            "name": "Glycerol",
            "synonyms": ["Glycerin", "Propane-1,2,3-triol"],
            "overview": "Glycerol is a penetrating cryoprotectant used for red blood cells and sperm.",
            "tags": "penetrating",
            "written_by": ["C. Polge"],
            "cas_number": "56-81-5",
            "class": "Polyol",
            "chemical_formula": "HOCH2CH(OH)CH2OH",
            "molecular_formula": "C3H8O3",
            "molecular_weight": "92.09 g/mol",
            "optimal_conc": "15% v/v",
            "structure_image": "/structures/glyc02.png",
            "references": [
                {"organisation": "Nature", "reference": "Polge, Smith and Parkes, revival of spermatozoa", "url": "https://example.org/polge-1949"}
            ],
            "cell_info": [
                {"cellType": "Sperm", "successRate": "70", "referenceURL": null},
                {"cellType": "Red blood cell", "successRate": "90", "referenceURL": null}
            ],
            "gras_info": {"found": true, "reference_url": "https://example.org/gras/glycerol"},
            "date_uploaded": "2024-03-02T10:00:00Z"
        },
        {
            "hash": "egly03",
            "name": "Ethylene Glycol",
            "synonyms": ["Ethane-1,2-diol", "Glycol"],
            "overview": "Ethylene glycol is a small diol used in vitrification solutions for oocytes and embryos.",
            "tags": "penetrating, vitrification",
            "written_by": ["G. Fahy"],
            "cas_number": "107-21-1",
            "class": "Diol",
            "molecular_formula": "C2H6O2",
            "molecular_weight": "62.07 g/mol",
            "optimal_conc": "7.5% v/v",
            "structure_image": "/structures/egly03.png",
            "cell_info": [
                {"cellType": "Oocyte", "successRate": "78", "referenceURL": null},
                {"cellType": "Embryo", "successRate": "81", "referenceURL": null}
            ],
            "gras_info": {"found": false, "reference_url": null},
            "date_uploaded": "2024-03-03T10:00:00Z"
        },
        {
            "hash": "treh04",
            "name": "Trehalose",
            "synonyms": ["Mycose"],
            "overview": "Trehalose is a non-penetrating disaccharide sugar that stabilises membranes during drying and freezing.",
            "tags": "non-penetrating, sugar",
            "written_by": [],
            "cas_number": "99-20-7",
            "class": "Sugar",
            "molecular_formula": "C12H22O11",
            "molecular_weight": "342.30 g/mol",
            "optimal_conc": "0.2 M",
            "cell_info": [
                {"cellType": "Fibroblast", "successRate": "55", "referenceURL": null}
            ],
            "gras_info": {"found": true, "reference_url": null},
            "date_uploaded": "2024-03-04T10:00:00Z"
        },
        {
            "hash": "sorb05",
            "name": "Sorbitol",
            "synonyms": ["Glucitol"],
            "overview": "Sorbitol is a sugar alcohol (polyol) added to extenders as a non-penetrating agent.",
            "tags": "non-penetrating",
            "cas_number": "50-70-4",
            "class": "Sugar alcohol",
            "molecular_formula": "C6H14O6",
            "molecular_weight": "182.17 g/mol",
            "cell_info": [],
            "gras_info": {"found": true, "reference_url": null},
            "date_uploaded": "2024-03-05T10:00:00Z"
        },
        {
            "hash": "prop06",
            "name": "Propylene Glycol",
            "synonyms": ["Propane-1,2-diol", "PROH", "Glycol"],
            "overview": "Propylene glycol is a penetrating cryoprotectant common in embryo vitrification.",
            "tags": "penetrating, vitrification",
            "cas_number": "57-55-6",
            "class": "Diol",
            "molecular_formula": "C3H8O2",
            "molecular_weight": "76.09",
            "optimal_conc": "1.5 M",
            "cell_info": [
                {"cellType": "Embryo", "successRate": "74", "referenceURL": null}
            ],
            "gras_info": {"found": true, "reference_url": null},
            "date_uploaded": "2024-03-06T10:00:00Z"
        }
    ])
}

pub fn sample_records() -> Result<Vec<CompoundRecord>> {
    Ok(serde_json::from_value(sample_documents())?)
}

/// Write the sample catalog to a temporary file in the given layout.
pub fn write_sample_dump(layout: DumpLayout) -> Result<NamedTempFile> {
    info!(?layout, "Writing sample compound dump");
    let mut file = NamedTempFile::new()?;
    match layout {
        DumpLayout::JsonArray => {
            serde_json::to_writer_pretty(&mut file, &sample_documents())?;
        }
        DumpLayout::NdJson => {
            if let Value::Array(documents) = sample_documents() {
                for document in documents {
                    serde_json::to_writer(&mut file, &document)?;
                    writeln!(file)?;
                }
            }
        }
    }
    file.flush()?;
    Ok(file)
}
