//! The generator's output: ordered blocks of Go source.

/// What a block of generated text declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Generated-code banner and `package` clause.
    Header,
    Imports,
    ClientInterface,
    ClientStruct,
    Constructor,
    /// Placeholder return type of a streaming client method.
    StreamClientType,
    ClientMethod,
    ServerInterface,
    Registration,
    HandlerStruct,
    ServerAdapter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBlock {
    pub kind: BlockKind,
    pub text: String,
}

/// Generated Go source for one schema file, as an ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub blocks: Vec<ArtifactBlock>,
}

impl GeneratedArtifact {
    pub fn push(&mut self, kind: BlockKind, text: String) {
        self.blocks.push(ArtifactBlock { kind, text });
    }

    /// Block kinds in emission order.
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(|b| b.kind).collect()
    }

    /// Concatenated source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            out.push_str(&block.text);
        }
        out
    }
}

impl Extend<ArtifactBlock> for GeneratedArtifact {
    fn extend<I: IntoIterator<Item = ArtifactBlock>>(&mut self, iter: I) {
        self.blocks.extend(iter);
    }
}
