/// Tags published for an image, in the order the registry returned them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTags {
    pub tags: Vec<String>,
}

impl ImageTags {
    pub fn new(tags: Vec<String>) -> Self {
        Self { tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}
