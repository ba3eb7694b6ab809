//! Copy assembly for the development, debug and end-to-end variants

use crate::resolver::FileSet;

use super::fingerprint::INDEX_PAGE;
use super::output::OutputFile;

/// The resolved index page plus every resolved file, verbatim.
pub fn copy_outputs(index_html: String, files: &FileSet) -> Vec<OutputFile> {
    let mut outputs = Vec::with_capacity(files.len() + 1);
    outputs.push(OutputFile::bytes(INDEX_PAGE, index_html));
    outputs.extend(
        files
            .iter()
            .filter(|(relative, _)| *relative != INDEX_PAGE)
            .map(|(relative, file)| OutputFile::copy(relative, &file.path)),
    );
    outputs
}
