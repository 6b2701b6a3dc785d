use crate::pipeline::TransformPipeline;
use crate::spec::data_source::DataSourceOptions;
use crate::spec::transform::Transform;

/// Computes the display names of transforms from their kind and the column
/// they are keyed on
#[derive(Debug, Clone, Copy)]
pub struct LabelResolver<'a> {
    options: &'a DataSourceOptions,
}

impl<'a> LabelResolver<'a> {
    pub fn new(options: &'a DataSourceOptions) -> Self {
        Self { options }
    }

    /// Label of the transform at `index`, e.g. `"Split: Region"`.
    ///
    /// A reference missing from the data-source options is shown verbatim, so this
    /// never fails and never returns an empty string.
    pub fn label_for(&self, transform: &Transform, index: usize) -> String {
        let base = transform.kind().label();
        let label = match transform.source_reference() {
            Some(reference) => {
                let display = self.options.label_for(reference).unwrap_or_else(|| {
                    log::trace!("No data source label for {reference}, showing raw reference");
                    reference
                });
                format!("{base}: {display}")
            }
            None => base.to_string(),
        };
        log::trace!("Resolved label of transform {index}: {label}");
        label
    }

    /// Labels of every transform, in pipeline order
    pub fn labels(&self, pipeline: &TransformPipeline) -> Vec<String> {
        pipeline
            .iter()
            .enumerate()
            .map(|(i, tx)| self.label_for(tx, i))
            .collect()
    }
}

pub fn label_for(transform: &Transform, index: usize, options: &DataSourceOptions) -> String {
    LabelResolver::new(options).label_for(transform, index)
}
