//! Hot-air balloon demo
//!
//! Parses an embedded YASF document describing a hot-air balloon over a
//! field, builds the render graph, and reports what was built. The envelope
//! is a single NURBS half-patch instantiated twice, once rotated, to show
//! per-reference instancing with forwarded transforms and a material
//! override.

use yasf_engine::foundation::math::Point3;
use yasf_engine::prelude::*;

const BALLOON_SCENE: &str = r#"{
    "yasf": {
        "globals": {
            "background": {"r": 0.5, "g": 0.7, "b": 0.95},
            "ambient": {"r": 0.35, "g": 0.35, "b": 0.35},
            "fog": {"color": {"r": 0.8, "g": 0.85, "b": 0.95}, "near": 50, "far": 400}
        },
        "materials": {
            "envelope_red": {"color": {"r": 0.8, "g": 0.1, "b": 0.1}, "shininess": 15},
            "envelope_gold": {"color": {"r": 0.9, "g": 0.7, "b": 0.1}, "shininess": 15},
            "wicker": {"color": {"r": 0.55, "g": 0.4, "b": 0.2}, "textureref": "wickerTex"},
            "rope": {"color": {"r": 0.4, "g": 0.35, "b": 0.3}},
            "grass": {"color": {"r": 0.2, "g": 0.55, "b": 0.2}, "texlength_s": 4, "texlength_t": 4}
        },
        "graph": {
            "rootid": "scene",
            "scene": {
                "children": {
                    "balloon": {
                        "type": "noderef",
                        "nodeId": "balloon_lod",
                        "transforms": [{"type": "translate", "amount": {"y": 12}}]
                    },
                    "ground": {
                        "type": "rectangle",
                        "xy1": {"x": -40, "y": -40},
                        "xy2": {"x": 40, "y": 40},
                        "transforms": [{"type": "rotate", "amount": {"x": -90}}],
                        "materialref": {"materialId": "grass"}
                    },
                    "sun": {
                        "type": "directionallight",
                        "color": {"r": 1, "g": 0.98, "b": 0.9},
                        "intensity": 1.2,
                        "position": {"x": 30, "y": 50, "z": 20},
                        "castshadow": true,
                        "shadowmapsize": 2048,
                        "shadowleft": -30, "shadowright": 30,
                        "shadowbottom": -30, "shadowtop": 30
                    },
                    "burner": {
                        "type": "pointlight",
                        "color": {"r": 1, "g": 0.6, "b": 0.2},
                        "intensity": 3,
                        "distance": 20,
                        "position": {"y": 11}
                    }
                }
            },
            "balloon_lod": {
                "type": "lod",
                "lodNodes": [
                    {"nodeId": "balloon_full", "mindist": 0},
                    {"nodeId": "balloon_far", "mindist": 120}
                ]
            },
            "balloon_full": {
                "children": {
                    "front": {
                        "type": "noderef",
                        "nodeId": "envelope_half",
                        "materialref": {"materialId": "envelope_red"}
                    },
                    "back": {
                        "type": "noderef",
                        "nodeId": "envelope_half",
                        "transforms": [{"type": "rotate", "amount": {"y": 180}}],
                        "materialref": {"materialId": "envelope_gold"}
                    },
                    "basket": {
                        "type": "box",
                        "xyz1": {"x": -0.6, "y": -3.2, "z": -0.6},
                        "xyz2": {"x": 0.6, "y": -2.4, "z": 0.6},
                        "materialref": {"materialId": "wicker"}
                    },
                    "rope_left": {
                        "type": "cylinder",
                        "base": 0.03, "top": 0.03, "height": 2.4, "slices": 6,
                        "transforms": [{"type": "translate", "amount": {"x": -0.5, "y": -1.4}}],
                        "materialref": {"materialId": "rope"}
                    },
                    "rope_right": {
                        "type": "cylinder",
                        "base": 0.03, "top": 0.03, "height": 2.4, "slices": 6,
                        "transforms": [{"type": "translate", "amount": {"x": 0.5, "y": -1.4}}],
                        "materialref": {"materialId": "rope"}
                    }
                }
            },
            "envelope_half": {
                "children": {
                    "patch": {
                        "type": "nurbs",
                        "degree_u": 3, "degree_v": 3,
                        "parts_u": 16, "parts_v": 16,
                        "controlpoints": [
                            {"x": -0.5, "y": 0.0, "z": 0.0},
                            {"x": -0.5, "y": 0.0, "z": 0.667},
                            {"x": 0.5, "y": 0.0, "z": 0.667},
                            {"x": 0.5, "y": 0.0, "z": 0.0},
                            {"x": -2.2, "y": 1.5, "z": 0.0},
                            {"x": -2.2, "y": 1.5, "z": 2.933},
                            {"x": 2.2, "y": 1.5, "z": 2.933},
                            {"x": 2.2, "y": 1.5, "z": 0.0},
                            {"x": -2.4, "y": 3.5, "z": 0.0},
                            {"x": -2.4, "y": 3.5, "z": 3.2},
                            {"x": 2.4, "y": 3.5, "z": 3.2},
                            {"x": 2.4, "y": 3.5, "z": 0.0},
                            {"x": -0.1, "y": 5.0, "z": 0.0},
                            {"x": -0.1, "y": 5.0, "z": 0.133},
                            {"x": 0.1, "y": 5.0, "z": 0.133},
                            {"x": 0.1, "y": 5.0, "z": 0.0}
                        ]
                    }
                }
            },
            "balloon_far": {
                "materialref": {"materialId": "envelope_red"},
                "children": {
                    "bulb": {"type": "sphere", "radius": 2.4, "slices": 8, "stacks": 6},
                    "basket": {
                        "type": "box",
                        "xyz1": {"x": -0.5, "y": -3.1, "z": -0.5},
                        "xyz2": {"x": 0.5, "y": -2.5, "z": 0.5},
                        "materialref": {"materialId": "wicker"}
                    }
                }
            }
        }
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    log::info!("Parsing balloon scene document...");
    let document = YasfDocument::from_json(BALLOON_SCENE)?;
    log::info!("Document loaded with {} materials", document.materials.len());

    let graph = document.build(BuildOptions::default())?;
    for warning in graph.warnings() {
        log::warn!("scene warning: {warning}");
    }
    log::info!(
        "Scene built: {} nodes, depth {}, {} triangles total",
        graph.len(),
        graph.depth(),
        graph.triangle_count()
    );

    graph.visit(|_, node, world| {
        if let Some(mesh) = &node.mesh {
            let origin = world.transform_point(&Point3::origin());
            log::info!(
                "mesh '{}': {} vertices, {} triangles at ({:.1}, {:.1}, {:.1})",
                node.name,
                mesh.vertex_count(),
                mesh.triangle_count(),
                origin.x,
                origin.y,
                origin.z
            );
        }
        if let Some(light) = &node.light {
            log::info!("light '{}': {:?} (intensity {})", node.name, light.kind, light.intensity);
        }
    });

    // Both envelope halves come from the same dictionary node
    let halves = graph.instances("envelope_half");
    log::info!("envelope instantiated {} times", halves.len());

    if let Some(lod) = graph.find("balloon_lod").and_then(|n| n.lod.as_ref()) {
        for distance in [10.0, 80.0, 200.0] {
            if let Some(level) = lod.select(distance) {
                let name = graph.node(level).map_or("?", |n| n.name.as_str());
                log::info!("viewer at {distance}: showing '{name}'");
            }
        }
    }

    Ok(())
}
