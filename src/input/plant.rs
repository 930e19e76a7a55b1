//! Code for reading the plant table.
use super::*;
use crate::parameter_set::ParameterSet;
use crate::plant::Plant;

const PLANTS_FILE_NAME: &str = "plants.csv";

/// Read the plant table from `plants.csv`.
///
/// Plants are indexed in the order they appear in the file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
pub fn read_plants(model_dir: &Path) -> Result<ParameterSet> {
    let file_path = model_dir.join(PLANTS_FILE_NAME);
    let plants: Vec<Plant> = read_csv(&file_path)?;

    ParameterSet::new(plants).with_context(|| input_err_msg(&file_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::toy_plants;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// Create an example plants file in `dir_path`
    fn create_plants_file(dir_path: &Path, rows: &str) {
        let file_path = dir_path.join(PLANTS_FILE_NAME);
        let mut file = File::create(file_path).unwrap();
        writeln!(
            file,
            "plant_id,min_output,max_output,min_up_time,min_down_time,startup_cost,no_load_cost,\
variable_cost,periods_on,periods_off
{rows}"
        )
        .unwrap();
    }

    #[rstest]
    fn test_read_plants(toy_plants: Vec<Plant>) {
        let dir = tempdir().unwrap();
        create_plants_file(
            dir.path(),
            "plant0,20,100,3,2,100,50,10,1,0
plant1,30,120,2,3,120,60,8,0,2",
        );

        let parameters = read_plants(dir.path()).unwrap();
        assert_eq!(parameters.plants(), toy_plants.as_slice());
    }

    #[test]
    fn test_read_plants_invalid() {
        let dir = tempdir().unwrap();
        create_plants_file(dir.path(), "plant0,20,10,3,2,100,50,10,1,0");

        let err = read_plants(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            input_err_msg(dir.path().join(PLANTS_FILE_NAME))
        );
        assert_eq!(
            err.chain().nth(1).unwrap().to_string(),
            "Plant 'plant0': `min_output` (20) exceeds `max_output` (10)"
        );
    }

    #[test]
    fn test_read_plants_negative_duration() {
        let dir = tempdir().unwrap();
        create_plants_file(dir.path(), "plant0,20,100,-3,2,100,50,10,1,0");
        assert!(read_plants(dir.path()).is_err());
    }
}
