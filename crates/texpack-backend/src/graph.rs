//! Shader graphs and bitmap source resolution.
//!
//! The packer only follows node-to-node connectivity. It never evaluates
//! what intermediate nodes compute: an artist may put color ramps, mix
//! nodes or math between an image and a shader socket, and the nearest
//! upstream image is still taken as the socket's source.

use std::collections::{HashSet, VecDeque};

use texpack_spec::NodeKind;

use crate::bitmap::Bitmap;

/// Stable index of a node within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Read-only view of a shader graph.
pub trait GraphView {
    /// The node feeding `socket` on `node`, if that input is linked.
    fn link_source(&self, node: NodeId, socket: &str) -> Option<NodeId>;

    /// Nodes feeding any linked input of `node`, in socket order.
    fn upstream_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_;

    /// The bitmap bound to `node`, if it is an image source with an image.
    fn image_source(&self, node: NodeId) -> Option<&Bitmap>;
}

/// Find the nearest bitmap feeding an input socket.
///
/// Breadth-first from the node on the other end of the socket's link, so
/// the image with the fewest hops wins. Cycles are tolerated. Returns
/// `None` for unlinked sockets and for purely procedural inputs.
pub fn resolve_source<'g, G: GraphView>(
    graph: &'g G,
    node: NodeId,
    socket: &str,
) -> Option<&'g Bitmap> {
    let start = graph.link_source(node, socket)?;

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::new();

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(bitmap) = graph.image_source(current) {
            return Some(bitmap);
        }
        queue.extend(graph.upstream_nodes(current).filter(|n| !visited.contains(n)));
    }

    None
}

/// A named image bound to an image-source node.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub name: String,
    pub bitmap: Bitmap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: String,
    pub kind: NodeKind,
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub to_socket: String,
}

/// In-memory shader graph owned by a material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderGraph {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl ShaderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node without an image.
    pub fn add_node(&mut self, key: impl Into<String>, kind: NodeKind) -> NodeId {
        self.push(Node {
            key: key.into(),
            kind,
            image: None,
        })
    }

    /// Add an image-source node bound to `bitmap`.
    pub fn add_image(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        bitmap: Bitmap,
    ) -> NodeId {
        self.push(Node {
            key: key.into(),
            kind: NodeKind::ImageTexture,
            image: Some(Image {
                name: name.into(),
                bitmap,
            }),
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Connect `from` to `socket` on `to`.
    ///
    /// An input socket takes a single link; linking it again replaces the
    /// previous link.
    pub fn link(&mut self, from: NodeId, to: NodeId, socket: impl Into<String>) {
        let socket = socket.into();
        self.links.retain(|l| !(l.to == to && l.to_socket == socket));
        self.links.push(Link {
            from,
            to,
            to_socket: socket,
        });
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Look a node up by its key.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.key == key)
            .map(|i| NodeId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first principal shader node.
    pub fn principal_shader(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.kind == NodeKind::PrincipledBsdf)
            .map(|i| NodeId(i as u32))
    }

    /// Every image-source node with a bound image, in insertion order.
    pub fn images(&self) -> impl Iterator<Item = &Image> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::ImageTexture)
            .filter_map(|n| n.image.as_ref())
    }
}

impl GraphView for ShaderGraph {
    fn link_source(&self, node: NodeId, socket: &str) -> Option<NodeId> {
        self.links
            .iter()
            .find(|l| l.to == node && l.to_socket == socket)
            .map(|l| l.from)
    }

    fn upstream_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.links.iter().filter(move |l| l.to == node).map(|l| l.from)
    }

    fn image_source(&self, node: NodeId) -> Option<&Bitmap> {
        let node = self.node(node)?;
        if node.kind != NodeKind::ImageTexture {
            return None;
        }
        node.image.as_ref().map(|i| &i.bitmap)
    }
}
