//! Shared fixtures for integration tests

use std::path::{Path, PathBuf};

use arrow::array::{Array, StringArray};
use shelter_features::{FeatureConfig, csv_schema, read_csv};

/// A small slice of the shelter outcomes training file
pub const SAMPLE_CSV: &str = "\
AnimalID,Name,DateTime,OutcomeType,OutcomeSubtype,AnimalType,SexuponOutcome,AgeuponOutcome,Breed,Color
A671945,Hambone,2014-02-12 18:22:00,Return_to_owner,,Dog,Neutered Male,1 year,Shetland Sheepdog Mix,Brown/White
A656520,Emily,2013-10-13 12:44:00,Euthanasia,Suffering,Cat,Spayed Female,1 year,Domestic Shorthair Mix,Cream Tabby
A686464,Pearce,2015-01-31 12:28:00,Adoption,Foster,Dog,Neutered Male,2 years,Pit Bull Mix,Blue/White
A683430,,2014-07-11 19:09:00,Transfer,Partner,Cat,Intact Male,3 weeks,Domestic Shorthair Mix,Blue Cream
A667013,,2013-11-15 12:52:00,Transfer,Partner,Dog,Neutered Male,2 years,Lhasa Apso/Miniature Poodle,Tan
A677334,Elsa,2014-04-25 13:04:00,Transfer,Partner,Dog,Intact Female,1 month,Cairn Terrier/Chihuahua Shorthair,Black/Tan
A699218,Jimmy,2015-03-28 13:11:00,Transfer,Partner,Cat,Intact Male,3 weeks,Domestic Shorthair Mix,Blue Tabby
A701489,,2015-04-30 17:02:00,Transfer,Partner,Cat,Unknown,3 weeks,Domestic Shorthair Mix,Brown Tabby
A671784,Lucy,2014-02-04 17:17:00,Adoption,,Dog,Spayed Female,5 months,American Pit Bull Terrier Mix,Red/White
A677747,,2014-05-03 07:48:00,Adoption,Offsite,Dog,Spayed Female,1 year,Cairn Terrier,White
A668402,,2013-12-05 15:50:00,Transfer,Partner,Cat,Unknown,,Domestic Shorthair Mix,Black
A705509,,2015-06-22 09:51:00,Transfer,Partner,Cat,Intact Female,6 days,Domestic Shorthair Mix,Orange Tabby
A684601,Rocket,2014-08-17 14:00:00,Adoption,,Dog,Neutered Male,a few years,Border Collie,Black/White
";

/// Write `content` to `name` inside `dir` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Configuration rooted at `root` with the default project layout
pub fn config_rooted_at(root: &Path) -> FeatureConfig {
    FeatureConfig {
        root: Some(root.to_path_buf()),
        ..FeatureConfig::default()
    }
}

/// Read a written CSV back through the Arrow reader as a header and rows of cells
///
/// Null cells come back as empty strings.
pub fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let batches = read_csv(path, &FeatureConfig::default()).unwrap();
    let header = csv_schema(path)
        .unwrap()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let mut rows = Vec::new();
    for batch in &batches {
        let columns: Vec<&StringArray> = batch
            .columns()
            .iter()
            .map(|c| c.as_any().downcast_ref::<StringArray>().unwrap())
            .collect();
        for i in 0..batch.num_rows() {
            let row = columns
                .iter()
                .map(|c| {
                    if c.is_null(i) {
                        String::new()
                    } else {
                        c.value(i).to_string()
                    }
                })
                .collect();
            rows.push(row);
        }
    }
    (header, rows)
}

/// Look up a cell by column name
pub fn cell<'a>(header: &[String], row: &'a [String], column: &str) -> &'a str {
    let idx = header.iter().position(|h| h == column).unwrap();
    &row[idx]
}
