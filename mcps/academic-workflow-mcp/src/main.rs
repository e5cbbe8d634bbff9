//! Academic Workflow MCP server
//!
//! Stdio MCP server exposing the academic writing phase state machine to the
//! chat agent: session workflow lifecycle, tool gating, phase transitions,
//! and progress views.

use academic_workflow_mcp::server::AcademicWorkflowServer;

mcp_common::serve_stdio!(AcademicWorkflowServer, "academic_workflow_mcp");
