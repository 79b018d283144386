use marrow_animation::BoneResolver;
use marrow_core::{MAX_BONES, MarrowError, Result};

/// A node in the bone hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joint {
    pub index: usize,
    /// `None` for a root joint.
    pub parent: Option<usize>,
    pub name: String,
}

impl Joint {
    #[must_use]
    pub fn new(index: usize, parent: Option<usize>, name: impl Into<String>) -> Self {
        Self {
            index,
            parent,
            name: name.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Ordered joint array in topological order.
///
/// Every joint's parent precedes it (`parent < index`), so a single forward
/// pass over the array visits parents before children. This is checked when
/// the skeleton is built and relied on afterwards.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl Skeleton {
    /// Validates `joints` against the default [`MAX_BONES`] ceiling.
    pub fn new(joints: Vec<Joint>) -> Result<Self> {
        Self::with_limit(joints, MAX_BONES)
    }

    pub fn with_limit(joints: Vec<Joint>, max_bones: usize) -> Result<Self> {
        if joints.len() > max_bones {
            return Err(MarrowError::BoneLimitExceeded {
                count: joints.len(),
                max: max_bones,
            });
        }

        for (position, joint) in joints.iter().enumerate() {
            if joint.index != position {
                return Err(MarrowError::JointIndexMismatch {
                    position,
                    index: joint.index,
                });
            }
            if let Some(parent) = joint.parent
                && parent >= position
            {
                return Err(MarrowError::InvalidJointOrder {
                    joint: position,
                    parent,
                });
            }
        }

        Ok(Self { joints })
    }

    /// Builds joints from `(name, parent)` pairs, assigning indices in order.
    pub fn from_parents<'a>(
        bones: impl IntoIterator<Item = (&'a str, Option<usize>)>,
    ) -> Result<Self> {
        let joints = bones
            .into_iter()
            .enumerate()
            .map(|(index, (name, parent))| Joint::new(index, parent, name))
            .collect();
        Self::new(joints)
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn joint(&self, index: usize) -> &Joint {
        &self.joints[index]
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.joints[index].parent
    }

    /// Exact, case-sensitive name lookup.
    #[must_use]
    pub fn find_bone_named(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }
}

impl BoneResolver for Skeleton {
    fn joint_count(&self) -> usize {
        self.len()
    }

    fn find_bone(&self, name: &str) -> Option<usize> {
        self.find_bone_named(name)
    }
}
